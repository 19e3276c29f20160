#![allow(non_snake_case)]

use super::*;
use crate::algebra::{CscMatrix, FloatT};
use indexmap::IndexMap;
use itertools::Itertools;
use std::collections::{BTreeSet, HashMap, HashSet};

// ---------------------------------
// checked out matrix data
// ---------------------------------

/// Matrix form `(A, b, c, x)` of a conic program, together with the
/// row and column indices used to build it.
///
/// Only available between [`check_out_matrices`](ConicProgram::check_out_matrices)
/// and [`check_in_matrices`](ConicProgram::check_in_matrices).
#[derive(Debug, Clone)]
pub struct ProgramMatrices<T = f64> {
    /// constraint matrix, one row per constraint and one column per variable
    pub A: CscMatrix<T>,
    /// constraint right hand sides
    pub b: Vec<T>,
    /// objective coefficients
    pub c: Vec<T>,
    /// variable values.  Solvers write their solution here.
    pub x: Vec<T>,

    variable_index: HashMap<VariableId, usize>,
    cone_index: HashMap<ConeId, usize>,
    constraint_index: HashMap<ConstraintId, usize>,
}

impl<T> ProgramMatrices<T>
where
    T: FloatT,
{
    pub fn variable_index(&self, var: VariableId) -> Result<usize, ProgramError> {
        self.variable_index
            .get(&var)
            .copied()
            .ok_or(ProgramError::NotRegistered(Entity::Variable(var)))
    }

    pub fn cone_index(&self, cone: ConeId) -> Result<usize, ProgramError> {
        self.cone_index
            .get(&cone)
            .copied()
            .ok_or(ProgramError::NotRegistered(Entity::Cone(cone)))
    }

    pub fn constraint_index(&self, con: ConstraintId) -> Result<usize, ProgramError> {
        self.constraint_index
            .get(&con)
            .copied()
            .ok_or(ProgramError::NotRegistered(Entity::Constraint(con)))
    }
}

// Derived matrix state.  Any structural change requires `Clean`.
#[derive(Debug, Clone)]
enum MatrixState<T> {
    Clean,
    CheckedOut(Box<ProgramMatrices<T>>),
}

// ---------------------------------
// conic program
// ---------------------------------

/// A conic program
///
/// $$
/// \begin{array}{rl}
/// \text{minimize} & c^T x\\\\\[2ex\]
///  \text{subject to} & Ax = b \\\\\[1ex\]
///         & x \in \mathcal{K}
///  \end{array}
/// $$
///
/// where $\mathcal{K}$ is a product of nonnegative orthant, second order and
/// rotated second order cones.  The program owns its cones (which in turn own
/// their variables) and its linear constraints, all kept in registration order.
///
/// The matrix form is derived on demand.  [`check_out_matrices`](Self::check_out_matrices)
/// assembles it and freezes the structure of the program;
/// [`check_in_matrices`](Self::check_in_matrices) writes `x` back into the
/// variables and discards it.  The program is not internally synchronized.
///
/// __Example usage__ :
///
/// ```no_run
/// use conic_partition::program::*;
///
/// let mut program = ConicProgram::<f64>::new();
/// let k1 = program.add_cone(ConeKind::NonNegativeOrthant, &[3.0]).unwrap();
/// let k2 = program.add_cone(ConeKind::SecondOrder, &[0.0, 0.0, 1.0]).unwrap();
///
/// let x1 = program.cone(k1).unwrap().variables()[0].id();
/// let t = program.cone(k2).unwrap().variables()[2].id();
/// program.add_constraint(&[(x1, 1.0), (t, -1.0)], 0.0).unwrap();
///
/// let matrices = program.check_out_matrices().unwrap();
/// assert_eq!(matrices.A.size(), (1, 4));
/// program.check_in_matrices().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConicProgram<T: FloatT = f64> {
    cones: IndexMap<ConeId, Cone<T>>,
    constraints: IndexMap<ConstraintId, LinearConstraint<T>>,
    owners: HashMap<VariableId, ConeId>,

    next_variable: usize,
    next_cone: usize,
    next_constraint: usize,

    matrices: MatrixState<T>,
}

impl<T> Default for ConicProgram<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self {
            cones: IndexMap::new(),
            constraints: IndexMap::new(),
            owners: HashMap::new(),
            next_variable: 0,
            next_cone: 0,
            next_constraint: 0,
            matrices: MatrixState::Clean,
        }
    }
}

impl<T> ConicProgram<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------
    // structural changes
    // ---------------------------------

    fn ensure_clean(&self) -> Result<(), ProgramError> {
        match self.matrices {
            MatrixState::Clean => Ok(()),
            MatrixState::CheckedOut(_) => Err(ProgramError::MatricesCheckedOut),
        }
    }

    /// Add a cone of the given kind with one new variable per entry of
    /// `objective`, which supplies the objective coefficients.
    ///
    /// The last variable of a second order cone, and the last two of a
    /// rotated second order cone, are the distinguished ones.
    pub fn add_cone(&mut self, kind: ConeKind, objective: &[T]) -> Result<ConeId, ProgramError> {
        self.ensure_clean()?;

        let id = ConeId(self.next_cone);
        let first = self.next_variable;
        let variables = objective
            .iter()
            .enumerate()
            .map(|(i, &c)| Variable::new(VariableId(first + i), id, c, T::zero()))
            .collect_vec();

        let cone = Cone::make(kind, id, variables)?;

        for v in cone.variables() {
            self.owners.insert(v.id(), id);
        }
        self.next_variable += objective.len();
        self.next_cone += 1;
        self.cones.insert(id, cone);

        Ok(id)
    }

    /// Add the linear constraint `Σ aᵢ xᵢ = rhs`.
    ///
    /// Every variable must belong to a cone of this program.  Repeated
    /// variables are summed and zero coefficients dropped; a constraint
    /// left without coefficients is rejected.
    pub fn add_constraint(
        &mut self,
        coefficients: &[(VariableId, T)],
        rhs: T,
    ) -> Result<ConstraintId, ProgramError> {
        self.ensure_clean()?;

        if let Some(&(var, _)) = coefficients
            .iter()
            .find(|(v, _)| !self.owners.contains_key(v))
        {
            return Err(ProgramError::NotRegistered(Entity::Variable(var)));
        }

        let id = ConstraintId(self.next_constraint);
        let constraint = LinearConstraint::new(id, coefficients, rhs);
        if constraint.is_empty() {
            return Err(ProgramError::EmptyConstraint);
        }

        self.next_constraint += 1;
        self.constraints.insert(id, constraint);
        Ok(id)
    }

    /// Remove a constraint, returning it.  Remaining constraints keep their order.
    pub fn remove_constraint(
        &mut self,
        id: ConstraintId,
    ) -> Result<LinearConstraint<T>, ProgramError> {
        self.ensure_clean()?;
        self.constraints
            .shift_remove(&id)
            .ok_or(ProgramError::NotRegistered(Entity::Constraint(id)))
    }

    pub fn set_objective_coefficient(&mut self, var: VariableId, c: T) -> Result<(), ProgramError> {
        self.ensure_clean()?;
        self.variable_mut(var)?.set_objective_coefficient(c);
        Ok(())
    }

    // ---------------------------------
    // lookups
    // ---------------------------------

    pub fn cone(&self, id: ConeId) -> Result<&Cone<T>, ProgramError> {
        self.cones
            .get(&id)
            .ok_or(ProgramError::NotRegistered(Entity::Cone(id)))
    }

    pub fn constraint(&self, id: ConstraintId) -> Result<&LinearConstraint<T>, ProgramError> {
        self.constraints
            .get(&id)
            .ok_or(ProgramError::NotRegistered(Entity::Constraint(id)))
    }

    /// the cone owning a variable
    pub fn cone_of(&self, var: VariableId) -> Result<&Cone<T>, ProgramError> {
        let id = self
            .owners
            .get(&var)
            .ok_or(ProgramError::NotRegistered(Entity::Variable(var)))?;
        self.cone(*id)
    }

    pub fn variable(&self, var: VariableId) -> Result<&Variable<T>, ProgramError> {
        let cone = self.cone_of(var)?;
        cone.position_of(var)
            .map(|i| &cone.variables()[i])
            .ok_or(ProgramError::NotRegistered(Entity::Variable(var)))
    }

    fn variable_mut(&mut self, var: VariableId) -> Result<&mut Variable<T>, ProgramError> {
        let not_registered = ProgramError::NotRegistered(Entity::Variable(var));
        let id = *self.owners.get(&var).ok_or(not_registered.clone())?;
        let cone = self.cones.get_mut(&id).ok_or(not_registered.clone())?;
        let i = cone.position_of(var).ok_or(not_registered)?;
        Ok(&mut cone.variables_mut()[i])
    }

    /// Cones in registration order
    pub fn cones(&self) -> impl Iterator<Item = &Cone<T>> {
        self.cones.values()
    }

    /// Constraints in registration order
    pub fn constraints(&self) -> impl Iterator<Item = &LinearConstraint<T>> {
        self.constraints.values()
    }

    /// Variables in column order, i.e. cone by cone
    pub fn variables(&self) -> impl Iterator<Item = &Variable<T>> {
        self.cones.values().flat_map(|k| k.variables().iter())
    }

    pub fn cones_of_kind(&self, kind: ConeKind) -> impl Iterator<Item = &Cone<T>> {
        self.cones.values().filter(move |k| k.kind() == kind)
    }

    /// The distinct cones touched by a constraint, in the order its
    /// coefficients are stored.
    pub fn cones_touched(&self, id: ConstraintId) -> Result<Vec<ConeId>, ProgramError> {
        let constraint = self.constraint(id)?;
        let touched = constraint
            .variables()
            .map(|v| self.cone_of(v).map(|k| k.id()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(touched.into_iter().unique().collect_vec())
    }

    /// The set of cone kinds present in the program
    pub fn cone_kinds(&self) -> BTreeSet<ConeKind> {
        self.cones.values().map(|k| k.kind()).collect()
    }

    pub fn num_cones(&self) -> usize {
        self.cones.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_variables(&self) -> usize {
        self.owners.len()
    }

    /// objective value `cᵀx` at the current variable values
    pub fn objective_value(&self) -> T {
        self.variables()
            .fold(T::zero(), |acc, v| acc + v.objective_coefficient() * v.value())
    }

    // ---------------------------------
    // matrix check out / check in
    // ---------------------------------

    pub fn is_checked_out(&self) -> bool {
        matches!(self.matrices, MatrixState::CheckedOut(_))
    }

    /// Assemble `(A, b, c, x)` and the index maps from the current cones and
    /// constraints.  Columns follow [`variables`](Self::variables), rows follow
    /// [`constraints`](Self::constraints).
    ///
    /// Fails with [`ProgramError::MatricesCheckedOut`] if the matrices are
    /// already checked out.
    pub fn check_out_matrices(&mut self) -> Result<&mut ProgramMatrices<T>, ProgramError> {
        self.ensure_clean()?;

        let variable_index: HashMap<VariableId, usize> = self
            .variables()
            .enumerate()
            .map(|(i, v)| (v.id(), i))
            .collect();
        let cone_index = self.cones.keys().enumerate().map(|(i, &k)| (k, i)).collect();
        let constraint_index = self
            .constraints
            .keys()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();

        let (m, n) = (self.constraints.len(), variable_index.len());
        let nnz = self.constraints.values().map(|c| c.len()).sum();
        let mut I = Vec::with_capacity(nnz);
        let mut J = Vec::with_capacity(nnz);
        let mut V = Vec::with_capacity(nnz);

        for (row, con) in self.constraints.values().enumerate() {
            for &(var, a) in con.coefficients() {
                let col = *variable_index
                    .get(&var)
                    .ok_or(ProgramError::NotRegistered(Entity::Variable(var)))?;
                I.push(row);
                J.push(col);
                V.push(a);
            }
        }

        let A = CscMatrix::new_from_triplets(m, n, &I, &J, &V)?;
        A.check_format()?;

        let b = self.constraints.values().map(|c| c.rhs()).collect();
        let c = self.variables().map(|v| v.objective_coefficient()).collect();
        let x = self.variables().map(|v| v.value()).collect();

        log::debug!(
            "Checked out program matrices with {} rows, {} columns and {} nonzeros",
            m,
            n,
            A.nnz()
        );

        let matrices = ProgramMatrices {
            A,
            b,
            c,
            x,
            variable_index,
            cone_index,
            constraint_index,
        };
        self.matrices = MatrixState::CheckedOut(Box::new(matrices));

        self.matrices_mut()
    }

    /// Write `x` back into the variables and discard the matrix form.
    pub fn check_in_matrices(&mut self) -> Result<(), ProgramError> {
        let matrices = match std::mem::replace(&mut self.matrices, MatrixState::Clean) {
            MatrixState::CheckedOut(matrices) => matrices,
            MatrixState::Clean => return Err(ProgramError::MatricesNotCheckedOut),
        };

        let (expected, found) = (self.num_variables(), matrices.x.len());
        if found != expected {
            self.matrices = MatrixState::CheckedOut(matrices);
            return Err(ProgramError::DimensionMismatch { expected, found });
        }

        let columns = self.cones.values_mut().flat_map(|k| k.variables_mut().iter_mut());
        for (var, &value) in columns.zip(matrices.x.iter()) {
            var.set_value(value);
        }

        Ok(())
    }

    pub fn matrices(&self) -> Result<&ProgramMatrices<T>, ProgramError> {
        match &self.matrices {
            MatrixState::CheckedOut(matrices) => Ok(matrices),
            MatrixState::Clean => Err(ProgramError::MatricesNotCheckedOut),
        }
    }

    pub fn matrices_mut(&mut self) -> Result<&mut ProgramMatrices<T>, ProgramError> {
        match &mut self.matrices {
            MatrixState::CheckedOut(matrices) => Ok(matrices),
            MatrixState::Clean => Err(ProgramError::MatricesNotCheckedOut),
        }
    }

    /// Column of a variable.  Requires checked out matrices.
    pub fn variable_index(&self, var: VariableId) -> Result<usize, ProgramError> {
        self.matrices()?.variable_index(var)
    }

    /// Position of a cone.  Requires checked out matrices.
    pub fn cone_index(&self, cone: ConeId) -> Result<usize, ProgramError> {
        self.matrices()?.cone_index(cone)
    }

    /// Row of a constraint.  Requires checked out matrices.
    pub fn constraint_index(&self, con: ConstraintId) -> Result<usize, ProgramError> {
        self.matrices()?.constraint_index(con)
    }

    // ---------------------------------
    // sub-programs
    // ---------------------------------

    /// Restriction of this program to a subset of its cones and constraints.
    ///
    /// The sub-program keeps the ids of this program, and registration order
    /// is preserved.  Every variable of a kept constraint must belong to a
    /// kept cone.
    pub fn restrict(
        &self,
        cones: &[ConeId],
        constraints: &[ConstraintId],
    ) -> Result<Self, ProgramError> {
        for &k in cones {
            self.cone(k)?;
        }
        for &c in constraints {
            self.constraint(c)?;
        }
        let keep_cones: HashSet<ConeId> = cones.iter().copied().collect();
        let keep_constraints: HashSet<ConstraintId> = constraints.iter().copied().collect();

        let mut sub = Self {
            next_variable: self.next_variable,
            next_cone: self.next_cone,
            next_constraint: self.next_constraint,
            ..Self::default()
        };

        for (&id, cone) in self.cones.iter().filter(|(k, _)| keep_cones.contains(*k)) {
            for v in cone.variables() {
                sub.owners.insert(v.id(), id);
            }
            sub.cones.insert(id, cone.clone());
        }

        for (&id, con) in self
            .constraints
            .iter()
            .filter(|(c, _)| keep_constraints.contains(*c))
        {
            if let Some(var) = con.variables().find(|v| !sub.owners.contains_key(v)) {
                return Err(ProgramError::NotRegistered(Entity::Variable(var)));
            }
            sub.constraints.insert(id, con.clone());
        }

        Ok(sub)
    }

    /// Copy the variable values of a sub-program into this program, matching
    /// variables by id.
    pub fn absorb_values(&mut self, sub: &Self) -> Result<(), ProgramError> {
        self.ensure_clean()?;
        for v in sub.variables() {
            self.variable_mut(v.id())?.set_value(v.value());
        }
        Ok(())
    }
}
