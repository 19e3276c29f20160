use crate::program::{ConeKind, ProgramError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
/// Error type returned by the hierarchical partitioner and weighting strategies.
pub enum PartitionError {
    /// A weighting strategy has no rule for this kind of cone
    #[error("Weighting strategy does not support {0} cones")]
    UnsupportedCone(ConeKind),
    /// Inconsistent program data
    #[error(transparent)]
    Program(#[from] ProgramError),
}
