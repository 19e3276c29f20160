use super::{WeightContext, WeightingStrategy};
use crate::algebra::*;
use crate::partition::{AcceptedSplit, PartitionError};
use crate::program::{Cone, LinearConstraint, ProgramCone};

/// Prices a cut by the share of the branch's variables held by the
/// candidate cone, so cuts next to small cones come first.
///
/// Constraints touching fewer than two distinct cones are ineligible and
/// restricted constraints weigh `restricted_weight`.  Accepted splits are
/// counted.
#[derive(Debug, Clone)]
pub struct SizeBalancingWeighting<T = f64> {
    pub restricted_weight: T,
    splits: usize,
    cuts: usize,
    largest_child: usize,
}

impl<T> Default for SizeBalancingWeighting<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self {
            restricted_weight: (1e6).as_T(),
            splits: 0,
            cuts: 0,
            largest_child: 0,
        }
    }
}

impl<T> SizeBalancingWeighting<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// number of accepted splits
    pub fn splits(&self) -> usize {
        self.splits
    }

    /// total number of constraints cut by accepted splits
    pub fn cuts(&self) -> usize {
        self.cuts
    }

    /// variables in the largest child produced so far
    pub fn largest_child(&self) -> usize {
        self.largest_child
    }
}

impl<T> WeightingStrategy<T> for SizeBalancingWeighting<T>
where
    T: FloatT,
{
    fn weight(
        &self,
        ctx: &WeightContext<'_, T>,
        constraint: &LinearConstraint<T>,
        cone: &Cone<T>,
    ) -> Result<T, PartitionError> {
        if ctx.restricted.contains(&constraint.id()) {
            return Ok(self.restricted_weight);
        }
        if ctx.program.cones_touched(constraint.id())?.len() < 2 {
            return Ok(T::infinity());
        }
        let dim: T = cone.dim().as_T();
        Ok(dim / ctx.branch_variables.max(1).as_T())
    }

    fn process_accepted_partition(&mut self, split: &AcceptedSplit<'_>) {
        self.splits += 1;
        self.cuts += split.cut.len();
        let largest = split
            .children
            .iter()
            .map(|p| p.num_variables())
            .max()
            .unwrap_or(0);
        self.largest_child = self.largest_child.max(largest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::*;
    use std::collections::HashSet;

    #[test]
    fn weight_follows_cone_size() {
        let mut p = ConicProgram::<f64>::new();
        let k1 = p.add_cone(ConeKind::NonNegativeOrthant, &[1.0]).unwrap();
        let k2 = p.add_cone(ConeKind::SecondOrder, &[0.0, 0.0, 1.0]).unwrap();
        let x = p.cone(k1).unwrap().variables()[0].id();
        let t = p.cone(k2).unwrap().variables()[2].id();
        let s = p.cone(k2).unwrap().variables()[0].id();
        let c = p.add_constraint(&[(x, 1.0), (t, -1.0)], 0.0).unwrap();
        let inner = p.add_constraint(&[(s, 1.0), (t, 1.0)], 2.0).unwrap();

        let none = HashSet::new();
        let ctx = WeightContext::new(&p, &none, &none);
        let strategy = SizeBalancingWeighting::new();
        let con = p.constraint(c).unwrap();

        assert_eq!(strategy.weight(&ctx, con, p.cone(k1).unwrap()), Ok(0.25));
        assert_eq!(strategy.weight(&ctx, con, p.cone(k2).unwrap()), Ok(0.75));

        let inner = p.constraint(inner).unwrap();
        let w = strategy.weight(&ctx, inner, p.cone(k2).unwrap()).unwrap();
        assert!(w.is_infinite());

        let restricted: HashSet<_> = [c].into_iter().collect();
        let ctx = WeightContext::new(&p, &restricted, &none);
        assert_eq!(strategy.weight(&ctx, con, p.cone(k1).unwrap()), Ok(1e6));
    }
}
