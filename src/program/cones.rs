use super::{ConeId, ProgramError, Variable};
use crate::algebra::FloatT;
use enum_dispatch::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag type for the kinds of cone a conic program may contain.
///
/// Used wherever the kind matters but the cone itself does not, e.g. when
/// asking a solver whether it supports the cones of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConeKind {
    /// x ≥ 0 for a single variable
    NonNegativeOrthant,
    /// xₙ ≥ ‖(x₁,…,xₙ₋₁)‖
    SecondOrder,
    /// 2 xₙ₋₁ xₙ ≥ ‖(x₁,…,xₙ₋₂)‖², xₙ₋₁,xₙ ≥ 0
    RotatedSecondOrder,
}

impl ConeKind {
    /// every supported cone kind
    pub const ALL: [ConeKind; 3] = [
        ConeKind::NonNegativeOrthant,
        ConeKind::SecondOrder,
        ConeKind::RotatedSecondOrder,
    ];

    /// true if `dim` variables make a valid cone of this kind
    pub fn accepts_dim(&self, dim: usize) -> bool {
        match self {
            ConeKind::NonNegativeOrthant => dim == 1,
            ConeKind::SecondOrder => dim >= 2,
            ConeKind::RotatedSecondOrder => dim >= 3,
        }
    }
}

impl std::fmt::Display for ConeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Behaviour shared by every cone of a conic program.
#[enum_dispatch]
pub trait ProgramCone<T>
where
    T: FloatT,
{
    fn id(&self) -> ConeId;
    fn kind(&self) -> ConeKind;
    fn variables(&self) -> &[Variable<T>];
    fn variables_mut(&mut self) -> &mut [Variable<T>];

    /// number of variables in the cone
    fn dim(&self) -> usize {
        self.variables().len()
    }

    /// Singleton cones are exactly the nonnegative orthant cones.
    fn is_singleton(&self) -> bool {
        self.kind() == ConeKind::NonNegativeOrthant
    }
}

// -------------------------------------
// Nonnegative orthant
// -------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NonNegativeOrthantCone<T = f64> {
    id: ConeId,
    variable: [Variable<T>; 1],
}

impl<T> NonNegativeOrthantCone<T>
where
    T: FloatT,
{
    pub(crate) fn new(id: ConeId, variable: Variable<T>) -> Self {
        Self {
            id,
            variable: [variable],
        }
    }

    pub fn variable(&self) -> &Variable<T> {
        &self.variable[0]
    }
}

impl<T> ProgramCone<T> for NonNegativeOrthantCone<T>
where
    T: FloatT,
{
    fn id(&self) -> ConeId {
        self.id
    }
    fn kind(&self) -> ConeKind {
        ConeKind::NonNegativeOrthant
    }
    fn variables(&self) -> &[Variable<T>] {
        &self.variable
    }
    fn variables_mut(&mut self) -> &mut [Variable<T>] {
        &mut self.variable
    }
}

// -------------------------------------
// Second order cone
// -------------------------------------

/// Second order cone.  The last variable is the distinguished
/// (epigraph) variable bounding the norm of the others.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondOrderCone<T = f64> {
    id: ConeId,
    variables: Vec<Variable<T>>,
}

impl<T> SecondOrderCone<T>
where
    T: FloatT,
{
    pub(crate) fn new(id: ConeId, variables: Vec<Variable<T>>) -> Result<Self, ProgramError> {
        if !ConeKind::SecondOrder.accepts_dim(variables.len()) {
            return Err(ProgramError::BadConeDimension {
                kind: ConeKind::SecondOrder,
                dim: variables.len(),
            });
        }
        Ok(Self { id, variables })
    }

    /// the distinguished variable
    pub fn nth_variable(&self) -> &Variable<T> {
        &self.variables[self.variables.len() - 1]
    }
}

impl<T> ProgramCone<T> for SecondOrderCone<T>
where
    T: FloatT,
{
    fn id(&self) -> ConeId {
        self.id
    }
    fn kind(&self) -> ConeKind {
        ConeKind::SecondOrder
    }
    fn variables(&self) -> &[Variable<T>] {
        &self.variables
    }
    fn variables_mut(&mut self) -> &mut [Variable<T>] {
        &mut self.variables
    }
}

// -------------------------------------
// Rotated second order cone
// -------------------------------------

/// Rotated second order cone.  The last two variables are the
/// distinguished pair whose product bounds the squared norm of the others.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedSecondOrderCone<T = f64> {
    id: ConeId,
    variables: Vec<Variable<T>>,
}

impl<T> RotatedSecondOrderCone<T>
where
    T: FloatT,
{
    pub(crate) fn new(id: ConeId, variables: Vec<Variable<T>>) -> Result<Self, ProgramError> {
        if !ConeKind::RotatedSecondOrder.accepts_dim(variables.len()) {
            return Err(ProgramError::BadConeDimension {
                kind: ConeKind::RotatedSecondOrder,
                dim: variables.len(),
            });
        }
        Ok(Self { id, variables })
    }

    pub fn nth_variable(&self) -> &Variable<T> {
        &self.variables[self.variables.len() - 1]
    }

    pub fn n_minus_1st_variable(&self) -> &Variable<T> {
        &self.variables[self.variables.len() - 2]
    }
}

impl<T> ProgramCone<T> for RotatedSecondOrderCone<T>
where
    T: FloatT,
{
    fn id(&self) -> ConeId {
        self.id
    }
    fn kind(&self) -> ConeKind {
        ConeKind::RotatedSecondOrder
    }
    fn variables(&self) -> &[Variable<T>] {
        &self.variables
    }
    fn variables_mut(&mut self) -> &mut [Variable<T>] {
        &mut self.variables
    }
}

// -------------------------------------
// closed union over the cone kinds
// -------------------------------------

/// A cone registered in a conic program.
#[enum_dispatch(ProgramCone<T>)]
#[derive(Debug, Clone, PartialEq)]
pub enum Cone<T>
where
    T: FloatT,
{
    NonNegativeOrthantCone(NonNegativeOrthantCone<T>),
    SecondOrderCone(SecondOrderCone<T>),
    RotatedSecondOrderCone(RotatedSecondOrderCone<T>),
}

impl<T> Cone<T>
where
    T: FloatT,
{
    pub(crate) fn make(
        kind: ConeKind,
        id: ConeId,
        variables: Vec<Variable<T>>,
    ) -> Result<Self, ProgramError> {
        if !kind.accepts_dim(variables.len()) {
            return Err(ProgramError::BadConeDimension {
                kind,
                dim: variables.len(),
            });
        }
        let cone = match kind {
            ConeKind::NonNegativeOrthant => {
                let mut variables = variables;
                NonNegativeOrthantCone::new(id, variables.remove(0)).into()
            }
            ConeKind::SecondOrder => SecondOrderCone::new(id, variables)?.into(),
            ConeKind::RotatedSecondOrder => RotatedSecondOrderCone::new(id, variables)?.into(),
        };
        Ok(cone)
    }

    /// position of a variable within this cone
    pub fn position_of(&self, var: super::VariableId) -> Option<usize> {
        self.variables().iter().position(|v| v.id() == var)
    }
}
