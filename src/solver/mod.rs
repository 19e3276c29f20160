//! Solving conic programs and partition trees.
//!
//! A solver backend implements [`ConicProgramSolver`].  The drivers
//! [`solve_partitions`] and [`solve_partitions_parallel`] solve the leaves of a
//! [`PartitionTree`](crate::partition::PartitionTree) one sub-program at a
//! time and write the values back into the root program.
//!
//! With the `clarabel` feature enabled, `ClarabelSolver` provides a backend
//! built on the Clarabel interior point solver.

mod driver;
mod error;
mod settings;
mod status;
mod traits;

#[cfg(feature = "clarabel")]
mod clarabel_solver;

pub use driver::*;
pub use error::*;
pub use settings::*;
pub use status::*;
pub use traits::*;

#[cfg(feature = "clarabel")]
pub use clarabel_solver::*;
