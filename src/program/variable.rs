#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! program_id {
    ($name:ident, $prefix:literal, $what:literal) => {
        #[doc = concat!("Identity of a ", $what, " within a conic program.")]
        ///
        /// Ids are allocated by the program that registers the entity and are
        /// preserved by [`restrict`](crate::program::ConicProgram::restrict),
        /// so a sub-program refers to the same entities as its root.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// raw id value
            pub fn raw(&self) -> usize {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

program_id!(VariableId, "x", "variable");
program_id!(ConeId, "K", "cone");
program_id!(ConstraintId, "c", "linear constraint");

/// A scalar variable of a conic program.
///
/// Every variable is owned by exactly one cone.  It carries its objective
/// coefficient and its current value, which is overwritten when a solved
/// program checks its matrices back in.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable<T = f64> {
    id: VariableId,
    cone: ConeId,
    objective_coefficient: T,
    value: T,
}

impl<T> Variable<T>
where
    T: Copy,
{
    pub(crate) fn new(id: VariableId, cone: ConeId, objective_coefficient: T, value: T) -> Self {
        Self {
            id,
            cone,
            objective_coefficient,
            value,
        }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }

    /// the cone that owns this variable
    pub fn cone(&self) -> ConeId {
        self.cone
    }

    pub fn objective_coefficient(&self) -> T {
        self.objective_coefficient
    }

    /// current value, i.e. the last solution written back
    pub fn value(&self) -> T {
        self.value
    }

    pub(crate) fn set_objective_coefficient(&mut self, c: T) {
        self.objective_coefficient = c;
    }

    pub(crate) fn set_value(&mut self, v: T) {
        self.value = v;
    }
}

#[test]
fn test_id_display() {
    assert_eq!(VariableId(3).to_string(), "x3");
    assert_eq!(ConeId(0).to_string(), "K0");
    assert_eq!(ConstraintId(12).to_string(), "c12");
    assert!(ConstraintId(1) < ConstraintId(2));
}
