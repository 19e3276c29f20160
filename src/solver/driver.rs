use super::{ConicProgramSolver, SolverError};
use crate::algebra::FloatT;
use crate::partition::PartitionTree;
use crate::program::{ConeKind, ConicProgram};
use itertools::Itertools;
use std::collections::BTreeSet;

fn ensure_supported<T, S>(solver: &S, kinds: &BTreeSet<ConeKind>) -> Result<(), SolverError>
where
    T: FloatT,
    S: ConicProgramSolver<T> + ?Sized,
{
    if solver.supports_cone_types(kinds) {
        return Ok(());
    }
    let unsupported = kinds
        .iter()
        .copied()
        .filter(|&k| !solver.supports_cone_types(&BTreeSet::from([k])))
        .collect_vec();
    Err(SolverError::UnsupportedCones(unsupported))
}

fn solve_one<T, S>(solver: &mut S, program: ConicProgram<T>) -> Result<ConicProgram<T>, SolverError>
where
    T: FloatT,
    S: ConicProgramSolver<T> + ?Sized,
{
    ensure_supported(solver, &program.cone_kinds())?;
    solver.set_conic_program(program);
    solver.solve()?;
    solver.take_conic_program().ok_or(SolverError::NoProgram)
}

/// Solve every leaf of `tree` in turn with `solver` and write the values
/// back into `program`.
///
/// Leaves are solved without the constraints cut by the partitioner.
/// Leaves without variables are skipped.  Stops at the first failure, in
/// which case values of leaves solved before it have already been written.
pub fn solve_partitions<T, S>(
    program: &mut ConicProgram<T>,
    tree: &PartitionTree,
    solver: &mut S,
) -> Result<(), SolverError>
where
    T: FloatT,
    S: ConicProgramSolver<T> + ?Sized,
{
    for (i, leaf) in tree.leaves().enumerate() {
        if leaf.partition().num_variables() == 0 {
            continue;
        }
        let sub = leaf.partition().subprogram(program)?;
        log::debug!(
            "Solving leaf {} with {} cones and {} constraints",
            i,
            sub.num_cones(),
            sub.num_constraints()
        );
        let sub = solve_one(solver, sub)?;
        program.absorb_values(&sub)?;
    }
    Ok(())
}

/// Solve the leaves of `tree` concurrently, one scoped thread and one
/// solver from `make_solver` per leaf, then write the values back into
/// `program` in leaf order.
///
/// Leaves share no variables, so the solves are independent.  Values are
/// only written if every leaf is solved; otherwise the first failure in
/// leaf order is returned.
pub fn solve_partitions_parallel<T, S, F>(
    program: &mut ConicProgram<T>,
    tree: &PartitionTree,
    make_solver: F,
) -> Result<(), SolverError>
where
    T: FloatT,
    S: ConicProgramSolver<T>,
    F: Fn() -> S + Sync,
{
    let subs = tree
        .leaves()
        .filter(|leaf| leaf.partition().num_variables() > 0)
        .map(|leaf| leaf.partition().subprogram(program))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Solving {} leaves in parallel", subs.len());

    let make_solver = &make_solver;
    let solved = std::thread::scope(|s| {
        let handles = subs
            .into_iter()
            .map(|sub| s.spawn(move || solve_one(&mut make_solver(), sub)))
            .collect_vec();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect::<Result<Vec<_>, _>>()
    })?;

    for sub in &solved {
        program.absorb_values(sub)?;
    }
    Ok(())
}
