use super::{AcceptedSplit, PartitionError};
use crate::algebra::FloatT;
use crate::program::{Cone, ConicProgram, ConstraintId, LinearConstraint};
use enum_dispatch::*;
use std::collections::HashSet;

mod balanced;
mod objective;
pub use balanced::*;
pub use objective::*;

/// Everything a weighting strategy may read while pricing a cut.
#[derive(Debug, Clone, Copy)]
pub struct WeightContext<'a, T: FloatT> {
    /// the root program
    pub program: &'a ConicProgram<T>,
    /// constraints whose cut is priced by the restricted rule
    pub restricted: &'a HashSet<ConstraintId>,
    /// constraints cut unconditionally
    pub always_cut: &'a HashSet<ConstraintId>,
    /// odd/even counter
    pub regime: usize,
    /// number of variables in the branch being split
    pub branch_variables: usize,
}

impl<'a, T> WeightContext<'a, T>
where
    T: FloatT,
{
    /// A context for pricing cuts over the whole of `program` in regime 0.
    pub fn new(
        program: &'a ConicProgram<T>,
        restricted: &'a HashSet<ConstraintId>,
        always_cut: &'a HashSet<ConstraintId>,
    ) -> Self {
        Self {
            program,
            restricted,
            always_cut,
            regime: 0,
            branch_variables: program.num_variables(),
        }
    }

    pub fn with_regime(mut self, regime: usize) -> Self {
        self.regime = regime;
        self
    }

    pub fn with_branch_variables(mut self, n: usize) -> Self {
        self.branch_variables = n;
        self
    }

    pub fn is_odd_regime(&self) -> bool {
        self.regime % 2 == 1
    }
}

/// Pricing policy used by the [`HierarchicalPartitioner`](super::HierarchicalPartitioner)
/// to choose which constraint to cut.
#[enum_dispatch]
pub trait WeightingStrategy<T>
where
    T: FloatT,
{
    /// Cost of cutting `constraint` next to `cone`, where `cone` is touched
    /// by `constraint`.  Smaller is preferred and `+∞` marks the pair as
    /// ineligible.
    fn weight(
        &self,
        ctx: &WeightContext<'_, T>,
        constraint: &LinearConstraint<T>,
        cone: &Cone<T>,
    ) -> Result<T, PartitionError>;

    /// Called once for every split the partitioner accepts.
    fn process_accepted_partition(&mut self, split: &AcceptedSplit<'_>);
}

/// Weighting strategy chosen at runtime
#[enum_dispatch(WeightingStrategy<T>)]
#[derive(Debug, Clone)]
pub enum Weighting<T>
where
    T: FloatT,
{
    ObjectiveCoefficientWeighting(ObjectiveCoefficientWeighting<T>),
    SizeBalancingWeighting(SizeBalancingWeighting<T>),
}
