#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status reported by a conic program solver after `solve`.
///
/// The `u32` representation is the status code carried by
/// [`SolverError::Solve`](super::SolverError::Solve).

#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverStatus {
    /// Problem is not solved (solver hasn't run).
    #[default]
    Unsolved,
    /// Solver terminated with a solution.
    Solved,
    /// Problem is primal infeasible.
    PrimalInfeasible,
    /// Problem is dual infeasible.
    DualInfeasible,
    /// Solver terminated with a solution (reduced accuracy)
    AlmostSolved,
    /// Problem is primal infeasible (reduced accuracy).
    AlmostPrimalInfeasible,
    /// Problem is dual infeasible (reduced accuracy).
    AlmostDualInfeasible,
    /// Iteration limit reached before solution or infeasibility certificate found.
    MaxIterations,
    /// Time limit reached before solution or infeasibility certificate found.
    MaxTime,
    /// Solver terminated with a numerical error
    NumericalError,
    /// Solver terminated due to lack of progress.
    InsufficientProgress,
    /// Backend reported a status with no counterpart here
    Unknown,
}

impl SolverStatus {
    /// status code, i.e. the enum discriminant
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Solutions with these statuses are written back to the program
    pub fn is_solved(&self) -> bool {
        matches!(*self, SolverStatus::Solved | SolverStatus::AlmostSolved)
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(
            *self,
            SolverStatus::PrimalInfeasible
                | SolverStatus::DualInfeasible
                | SolverStatus::AlmostPrimalInfeasible
                | SolverStatus::AlmostDualInfeasible
        )
    }

    pub fn is_errored(&self) -> bool {
        // status is any of the error codes
        matches!(
            *self,
            SolverStatus::NumericalError | SolverStatus::InsufficientProgress | SolverStatus::Unknown
        )
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[test]
fn test_status_codes() {
    assert_eq!(SolverStatus::default(), SolverStatus::Unsolved);
    assert_eq!(SolverStatus::Unsolved.code(), 0);
    assert_eq!(SolverStatus::PrimalInfeasible.code(), 2);
    assert!(SolverStatus::AlmostSolved.is_solved());
    assert!(!SolverStatus::MaxTime.is_solved());
    assert!(SolverStatus::AlmostDualInfeasible.is_infeasible());
    assert!(SolverStatus::Unknown.is_errored());
}
