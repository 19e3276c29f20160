use super::SolverError;
use crate::algebra::FloatT;
use crate::program::{ConeKind, ConicProgram};
use std::collections::BTreeSet;

/// A solver for conic programs.
///
/// The solver takes ownership of a program with
/// [`set_conic_program`](Self::set_conic_program).  A successful
/// [`solve`](Self::solve) leaves the optimal values in the program's
/// variables, which keep their ids, and the program is handed back with
/// [`take_conic_program`](Self::take_conic_program).
pub trait ConicProgramSolver<T: FloatT> {
    /// true if every kind in `kinds` can be solved
    fn supports_cone_types(&self, kinds: &BTreeSet<ConeKind>) -> bool;

    /// Replace the program to solve, returning the previous one
    fn set_conic_program(&mut self, program: ConicProgram<T>) -> Option<ConicProgram<T>>;

    fn conic_program(&self) -> Option<&ConicProgram<T>>;

    fn take_conic_program(&mut self) -> Option<ConicProgram<T>>;

    /// Solve the current program and write the solution into its variables.
    ///
    /// Fails with [`SolverError::NoProgram`] if no program is set and with
    /// [`SolverError::Solve`] if the backend does not find a solution.
    fn solve(&mut self) -> Result<(), SolverError>;
}
