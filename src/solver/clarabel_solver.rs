#![allow(non_snake_case)]

use super::*;
use crate::algebra::CscMatrix;
use crate::program::*;
use ::clarabel::algebra as cl_algebra;
use ::clarabel::solver as cl_solver;
use ::clarabel::solver::IPSolver;
use ::clarabel::solver::SupportedConeT::*;
use std::collections::BTreeSet;

/// [`ConicProgramSolver`] backed by the Clarabel interior point solver.
///
/// The program `min cᵀx s.t. Ax = b, x ∈ K` is passed to Clarabel in its
/// `Ax + s = b, s ∈ K` form: the equality rows go to a zero cone, orthant
/// variables to a single nonnegative cone and each second order cone to a
/// second order cone with its distinguished variable first.  A rotated
/// cone with distinguished variables `x₁, x₂` becomes a second order cone
/// over `((x₁+x₂)/√2, (x₁−x₂)/√2, …)`.
#[derive(Debug, Default)]
pub struct ClarabelSolver {
    settings: SolverSettings<f64>,
    program: Option<ConicProgram<f64>>,
    status: SolverStatus,
}

impl ClarabelSolver {
    pub fn new(settings: SolverSettings<f64>) -> Self {
        Self {
            settings,
            program: None,
            status: SolverStatus::Unsolved,
        }
    }

    pub fn settings(&self) -> &SolverSettings<f64> {
        &self.settings
    }

    /// status of the last solve
    pub fn status(&self) -> SolverStatus {
        self.status
    }
}

// Clarabel problem data
struct ClarabelData {
    A: cl_algebra::CscMatrix<f64>,
    b: Vec<f64>,
    q: Vec<f64>,
    cones: Vec<cl_solver::SupportedConeT<f64>>,
}

// row builder for the stacked constraint matrix
#[derive(Default)]
struct Rows {
    I: Vec<usize>,
    J: Vec<usize>,
    V: Vec<f64>,
    b: Vec<f64>,
}

impl Rows {
    fn push(&mut self, entries: &[(usize, f64)], rhs: f64) {
        let row = self.b.len();
        for &(col, a) in entries {
            self.I.push(row);
            self.J.push(col);
            self.V.push(a);
        }
        self.b.push(rhs);
    }
}

// assemble from checked out matrices
fn assemble(program: &ConicProgram<f64>) -> Result<ClarabelData, SolverError> {
    let matrices = program.matrices()?;
    let (m, n) = matrices.A.size();
    let col = |v: &Variable<f64>| matrices.variable_index(v.id());

    let mut rows = Rows::default();

    // equality rows
    let mut entries = vec![Vec::new(); m];
    for j in 0..n {
        for (i, a) in matrices.A.column(j) {
            entries[i].push((j, a));
        }
    }
    for (row, &rhs) in entries.iter().zip(&matrices.b) {
        rows.push(row, rhs);
    }
    let mut cones = Vec::new();
    if m > 0 {
        cones.push(ZeroConeT(m));
    }

    let orthants = program
        .cones_of_kind(ConeKind::NonNegativeOrthant)
        .map(|k| col(&k.variables()[0]))
        .collect::<Result<Vec<_>, _>>()?;
    for &j in &orthants {
        rows.push(&[(j, -1.0)], 0.0);
    }
    if !orthants.is_empty() {
        cones.push(NonnegativeConeT(orthants.len()));
    }

    let r = std::f64::consts::FRAC_1_SQRT_2;
    for cone in program.cones() {
        match cone {
            Cone::NonNegativeOrthantCone(_) => {}
            Cone::SecondOrderCone(k) => {
                rows.push(&[(col(k.nth_variable())?, -1.0)], 0.0);
                for v in &k.variables()[..k.dim() - 1] {
                    rows.push(&[(col(v)?, -1.0)], 0.0);
                }
                cones.push(SecondOrderConeT(k.dim()));
            }
            Cone::RotatedSecondOrderCone(k) => {
                let x1 = col(k.n_minus_1st_variable())?;
                let x2 = col(k.nth_variable())?;
                rows.push(&[(x1, -r), (x2, -r)], 0.0);
                rows.push(&[(x1, -r), (x2, r)], 0.0);
                for v in &k.variables()[..k.dim() - 2] {
                    rows.push(&[(col(v)?, -1.0)], 0.0);
                }
                cones.push(SecondOrderConeT(k.dim()));
            }
        }
    }

    let A = CscMatrix::new_from_triplets(rows.b.len(), n, &rows.I, &rows.J, &rows.V)
        .map_err(ProgramError::from)?;
    let A = cl_algebra::CscMatrix::new(A.m, A.n, A.colptr, A.rowval, A.nzval);

    Ok(ClarabelData {
        A,
        b: rows.b,
        q: matrices.c.clone(),
        cones,
    })
}

fn clarabel_settings(
    settings: &SolverSettings<f64>,
) -> Result<cl_solver::DefaultSettings<f64>, SolverError> {
    settings.validate()?;
    if settings.solve_form != SolveForm::Free {
        log::warn!(
            "Clarabel has no {:?} solve form, solving the program as given",
            settings.solve_form
        );
    }
    cl_solver::DefaultSettingsBuilder::default()
        .tol_gap_rel(settings.tol_gap_rel)
        .tol_feas(settings.tol_feas_primal.min(settings.tol_feas_dual))
        .max_threads(settings.num_threads)
        .verbose(settings.verbose)
        .build()
        .map_err(|e| SolverError::Settings(e.to_string()))
}

#[allow(unreachable_patterns)]
fn status_from(status: cl_solver::SolverStatus) -> SolverStatus {
    use cl_solver::SolverStatus as S;
    match status {
        S::Unsolved => SolverStatus::Unsolved,
        S::Solved => SolverStatus::Solved,
        S::PrimalInfeasible => SolverStatus::PrimalInfeasible,
        S::DualInfeasible => SolverStatus::DualInfeasible,
        S::AlmostSolved => SolverStatus::AlmostSolved,
        S::AlmostPrimalInfeasible => SolverStatus::AlmostPrimalInfeasible,
        S::AlmostDualInfeasible => SolverStatus::AlmostDualInfeasible,
        S::MaxIterations => SolverStatus::MaxIterations,
        S::MaxTime => SolverStatus::MaxTime,
        S::NumericalError => SolverStatus::NumericalError,
        S::InsufficientProgress => SolverStatus::InsufficientProgress,
        _ => SolverStatus::Unknown,
    }
}

// solve with checked out matrices, writing x on success
fn run(
    program: &mut ConicProgram<f64>,
    settings: &SolverSettings<f64>,
) -> Result<SolverStatus, SolverError> {
    let data = assemble(program)?;
    let settings = clarabel_settings(settings)?;
    let n = data.q.len();
    let P = cl_algebra::CscMatrix::new(n, n, vec![0; n + 1], Vec::new(), Vec::new());

    log::debug!(
        "Starting Clarabel on {} variables and {} cone rows",
        n,
        data.b.len()
    );
    let mut solver = cl_solver::DefaultSolver::new(&P, &data.q, &data.A, &data.b, &data.cones, settings);
    solver.solve();

    let status = status_from(solver.solution.status);
    log::debug!("Clarabel finished with status {}", status);

    if status.is_solved() {
        program.matrices_mut()?.x.copy_from_slice(&solver.solution.x);
    }
    Ok(status)
}

impl ConicProgramSolver<f64> for ClarabelSolver {
    fn supports_cone_types(&self, kinds: &BTreeSet<ConeKind>) -> bool {
        kinds.iter().all(|k| ConeKind::ALL.contains(k))
    }

    fn set_conic_program(&mut self, program: ConicProgram<f64>) -> Option<ConicProgram<f64>> {
        self.status = SolverStatus::Unsolved;
        self.program.replace(program)
    }

    fn conic_program(&self) -> Option<&ConicProgram<f64>> {
        self.program.as_ref()
    }

    fn take_conic_program(&mut self) -> Option<ConicProgram<f64>> {
        self.program.take()
    }

    fn solve(&mut self) -> Result<(), SolverError> {
        let program = self.program.as_mut().ok_or(SolverError::NoProgram)?;

        program.check_out_matrices()?;
        let outcome = run(program, &self.settings);
        program.check_in_matrices()?;

        let status = outcome?;
        self.status = status;
        match status {
            SolverStatus::Solved => Ok(()),
            SolverStatus::AlmostSolved => {
                log::warn!("Clarabel returned a reduced accuracy solution");
                Ok(())
            }
            status => Err(SolverError::Solve { status }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_program() {
        // min x1 + 2 x2 s.t. x1 + x2 = 1, x3 - x1 = 0, ‖x4‖ ≤ x3
        let mut p = ConicProgram::<f64>::new();
        let k1 = p.add_cone(ConeKind::NonNegativeOrthant, &[1.0]).unwrap();
        let k2 = p.add_cone(ConeKind::NonNegativeOrthant, &[2.0]).unwrap();
        let k3 = p.add_cone(ConeKind::SecondOrder, &[0.0, 0.0]).unwrap();
        let x1 = p.cone(k1).unwrap().variables()[0].id();
        let x2 = p.cone(k2).unwrap().variables()[0].id();
        let t = p.cone(k3).unwrap().variables()[1].id();
        p.add_constraint(&[(x1, 1.0), (x2, 1.0)], 1.0).unwrap();
        p.add_constraint(&[(t, 1.0), (x1, -1.0)], 0.0).unwrap();

        let mut solver = ClarabelSolver::default();
        assert_eq!(solver.solve(), Err(SolverError::NoProgram));

        solver.set_conic_program(p);
        solver.solve().unwrap();
        assert_eq!(solver.status(), SolverStatus::Solved);

        let p = solver.take_conic_program().unwrap();
        assert!(!p.is_checked_out());
        assert!((p.variable(x1).unwrap().value() - 1.0).abs() < 1e-6);
        assert!((p.objective_value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn infeasible_program_fails() {
        let mut p = ConicProgram::<f64>::new();
        let k = p.add_cone(ConeKind::NonNegativeOrthant, &[1.0]).unwrap();
        let x = p.cone(k).unwrap().variables()[0].id();
        p.add_constraint(&[(x, 1.0)], -1.0).unwrap();

        let mut solver = ClarabelSolver::default();
        solver.set_conic_program(p);
        assert!(matches!(solver.solve(), Err(SolverError::Solve { status }) if status.is_infeasible()));
    }
}
