use super::{SettingsError, SolverStatus};
use crate::partition::PartitionError;
use crate::program::{ConeKind, ProgramError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
/// Error type returned by conic program solvers and the partition drivers.
pub enum SolverError {
    /// `solve` called before a program was set
    #[error("No conic program has been set")]
    NoProgram,
    /// The backend finished without an acceptable solution
    #[error("Solver finished with status {status} (code {})", *status as u32)]
    Solve { status: SolverStatus },
    /// The program contains cones the solver cannot handle
    #[error("Solver does not support cones of kind {0:?}")]
    UnsupportedCones(Vec<ConeKind>),
    /// Settings rejected by the backend
    #[error("Invalid solver settings: {0}")]
    Settings(String),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Partition(#[from] PartitionError),
}

impl From<SettingsError> for SolverError {
    fn from(e: SettingsError) -> Self {
        SolverError::Settings(e.to_string())
    }
}
