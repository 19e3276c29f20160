use super::{ConstraintId, VariableId};
use crate::algebra::FloatT;

/// A sparse linear equality `Σ aᵢ xᵢ = b` over program variables.
///
/// Coefficients are kept in first-appearance order, which is the fixed
/// order in which weighting strategies scan a constraint.  Coefficients
/// given more than once for the same variable are summed, and entries
/// that end up zero are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint<T = f64> {
    id: ConstraintId,
    coefficients: Vec<(VariableId, T)>,
    rhs: T,
}

impl<T> LinearConstraint<T>
where
    T: FloatT,
{
    pub(crate) fn new(id: ConstraintId, coefficients: &[(VariableId, T)], rhs: T) -> Self {
        let mut merged: Vec<(VariableId, T)> = Vec::with_capacity(coefficients.len());
        for &(var, a) in coefficients {
            match merged.iter_mut().find(|(v, _)| *v == var) {
                Some((_, acc)) => *acc += a,
                None => merged.push((var, a)),
            }
        }
        merged.retain(|(_, a)| *a != T::zero());

        Self {
            id,
            coefficients: merged,
            rhs,
        }
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    /// (variable, coefficient) pairs, none of them zero
    pub fn coefficients(&self) -> &[(VariableId, T)] {
        &self.coefficients
    }

    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.coefficients.iter().map(|(v, _)| *v)
    }

    pub fn coefficient(&self, var: VariableId) -> Option<T> {
        self.coefficients
            .iter()
            .find(|(v, _)| *v == var)
            .map(|(_, a)| *a)
    }

    /// right hand side `b`
    pub fn rhs(&self) -> T {
        self.rhs
    }

    /// number of variables with a nonzero coefficient
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

#[test]
fn test_constraint_merges_and_drops_zeros() {
    let c = LinearConstraint::new(
        ConstraintId(0),
        &[
            (VariableId(2), 1.0),
            (VariableId(0), 0.0),
            (VariableId(1), 2.0),
            (VariableId(2), 0.5),
            (VariableId(3), 1.0),
            (VariableId(3), -1.0),
        ],
        4.0,
    );
    assert_eq!(c.coefficients(), &[(VariableId(2), 1.5), (VariableId(1), 2.0)]);
    assert_eq!(c.coefficient(VariableId(1)), Some(2.0));
    assert_eq!(c.coefficient(VariableId(3)), None);
    assert_eq!(c.rhs(), 4.0);
    assert_eq!(c.len(), 2);
}
