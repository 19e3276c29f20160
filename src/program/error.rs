use super::{ConeId, ConeKind, ConstraintId, VariableId};
use crate::algebra::SparseFormatError;
use thiserror::Error;

/// A variable, cone or constraint reference, as reported in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Variable(VariableId),
    Cone(ConeId),
    Constraint(ConstraintId),
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Entity::Variable(id) => write!(f, "variable {}", id),
            Entity::Cone(id) => write!(f, "cone {}", id),
            Entity::Constraint(id) => write!(f, "constraint {}", id),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
/// Error type returned by conic program construction and matrix access.
pub enum ProgramError {
    /// Lookup of an entity that is not registered in this program
    #[error("{0} is not registered in this program")]
    NotRegistered(Entity),
    /// Number of variables is invalid for the requested cone kind
    #[error("A {kind} cone cannot have {dim} variables")]
    BadConeDimension { kind: ConeKind, dim: usize },
    /// Constraint has no nonzero coefficients
    #[error("Linear constraint has no nonzero coefficients")]
    EmptyConstraint,
    /// Structural change or second check-out while matrices are checked out
    #[error("Program matrices are checked out")]
    MatricesCheckedOut,
    /// Index or matrix access without a preceding check-out
    #[error("Program matrices are not checked out")]
    MatricesNotCheckedOut,
    /// Solution vector length does not match the number of variables
    #[error("Solution vector has length {found}, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    /// Assembled constraint matrix is malformed
    #[error("Bad constraint matrix: {0}")]
    Sparse(#[from] SparseFormatError),
}
