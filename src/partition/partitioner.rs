use super::disjoint_set_union::DisjointSetUnion;
use super::*;
use crate::algebra::FloatT;
use crate::program::{ConeId, ConicProgram, ConstraintId, Entity, ProgramCone, ProgramError};
use itertools::Itertools;
use std::collections::{HashMap, HashSet, VecDeque};

// a branch's constraint together with the (branch local) cones it touches
struct BranchConstraint {
    id: ConstraintId,
    cones: Vec<usize>,
}

// outcome of a successful split search
struct Split {
    sides: [Partition; 2],
    cut: Vec<ConstraintId>,
}

/// Recursively splits a conic program into a binary tree of partitions by
/// cutting linear constraints.
///
/// Each branch is split by cutting the cheapest constraint, as priced by
/// the weighting strategy, until its cones fall into at least two groups
/// that share no uncut constraint.  The groups are then dealt to two
/// halves.  Constraints in the always-cut set are cut at the first split
/// of any branch holding them.  Branches are processed breadth first and
/// every accepted split advances the odd/even regime by one, so a given
/// program and strategy always yield the same tree.
///
/// __Example usage__ :
///
/// ```no_run
/// use conic_partition::partition::*;
/// use conic_partition::program::*;
///
/// let mut program = ConicProgram::<f64>::new();
/// let k1 = program.add_cone(ConeKind::NonNegativeOrthant, &[3.0]).unwrap();
/// let k2 = program.add_cone(ConeKind::NonNegativeOrthant, &[-5.0]).unwrap();
/// let x1 = program.cone(k1).unwrap().variables()[0].id();
/// let x2 = program.cone(k2).unwrap().variables()[0].id();
/// program.add_constraint(&[(x1, 1.0), (x2, 1.0)], 1.0).unwrap();
///
/// let mut partitioner = HierarchicalPartitioner::new(ObjectiveCoefficientWeighting::new());
/// let settings = PartitionerSettingsBuilder::default()
///     .min_partition_variables(1)
///     .build()
///     .unwrap();
/// let tree = partitioner.partition(&program, &settings).unwrap();
/// assert_eq!(tree.num_leaves(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HierarchicalPartitioner<W> {
    strategy: W,
    restricted: HashSet<ConstraintId>,
    always_cut: HashSet<ConstraintId>,
    initial_regime: usize,
}

impl<W> HierarchicalPartitioner<W> {
    pub fn new(strategy: W) -> Self {
        Self {
            strategy,
            restricted: HashSet::new(),
            always_cut: HashSet::new(),
            initial_regime: 0,
        }
    }

    /// Take the initial regime from `settings`
    pub fn with_settings(mut self, settings: &PartitionerSettings) -> Self {
        self.initial_regime = settings.initial_regime;
        self
    }

    pub fn with_restricted_constraints<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ConstraintId>,
    {
        self.restricted.extend(ids);
        self
    }

    pub fn with_always_cut_constraints<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ConstraintId>,
    {
        self.always_cut.extend(ids);
        self
    }

    pub fn with_initial_regime(mut self, regime: usize) -> Self {
        self.initial_regime = regime;
        self
    }

    pub fn strategy(&self) -> &W {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut W {
        &mut self.strategy
    }

    pub fn into_strategy(self) -> W {
        self.strategy
    }

    pub fn restricted_constraints(&self) -> &HashSet<ConstraintId> {
        &self.restricted
    }

    pub fn always_cut_constraints(&self) -> &HashSet<ConstraintId> {
        &self.always_cut
    }

    /// Partition `program` until `terminate` holds or no branch has an
    /// eligible cut.
    ///
    /// Fails if the strategy cannot price a cut, e.g. with
    /// [`PartitionError::UnsupportedCone`].
    pub fn partition<T, P>(
        &mut self,
        program: &ConicProgram<T>,
        terminate: &P,
    ) -> Result<PartitionTree, PartitionError>
    where
        T: FloatT,
        W: WeightingStrategy<T>,
        P: TerminationPredicate + ?Sized,
    {
        let root = Partition::new(
            program.cones().map(|k| k.id()).collect(),
            program.constraints().map(|c| c.id()).collect(),
            program.num_variables(),
        );
        let mut tree = PartitionTree::new(root);
        let mut queue = VecDeque::from([0]);
        let mut accepted = 0;

        while let Some(index) = queue.pop_front() {
            let (partition, depth) = match tree.node(index) {
                Some(node) => (node.partition(), node.depth()),
                None => continue,
            };
            if terminate.should_terminate(partition, depth) {
                continue;
            }

            let regime = self.initial_regime + accepted;
            let split = match self.find_split(program, partition, regime)? {
                Some(split) => split,
                None => continue,
            };

            let children = tree.split(index, split.sides, split.cut);
            accepted += 1;

            if let (Some(parent), Some(a), Some(b)) = (
                tree.node(index),
                tree.node(children[0]),
                tree.node(children[1]),
            ) {
                log::debug!(
                    "Split partition at depth {} with {} cut(s) into {} + {} variables",
                    depth,
                    parent.cut().len(),
                    a.partition().num_variables(),
                    b.partition().num_variables()
                );
                let accepted_split = AcceptedSplit {
                    parent: parent.partition(),
                    children: [a.partition(), b.partition()],
                    cut: parent.cut(),
                    depth,
                };
                self.strategy.process_accepted_partition(&accepted_split);
            }

            queue.extend(children);
        }

        Ok(tree)
    }

    fn find_split<T>(
        &self,
        program: &ConicProgram<T>,
        partition: &Partition,
        regime: usize,
    ) -> Result<Option<Split>, PartitionError>
    where
        T: FloatT,
        W: WeightingStrategy<T>,
    {
        let cones = partition.cones();
        let local: HashMap<ConeId, usize> = cones.iter().enumerate().map(|(i, &k)| (k, i)).collect();
        let dims = cones
            .iter()
            .map(|&k| program.cone(k).map(|k| k.dim()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut branch = Vec::with_capacity(partition.constraints().len());
        for &id in partition.constraints() {
            let touched = program
                .cones_touched(id)?
                .into_iter()
                .map(|k| {
                    local
                        .get(&k)
                        .copied()
                        .ok_or(ProgramError::NotRegistered(Entity::Cone(k)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            branch.push(BranchConstraint { id, cones: touched });
        }

        // always-cut constraints go first
        let mut live = branch
            .iter()
            .map(|c| !self.always_cut.contains(&c.id))
            .collect_vec();
        let mut cut = branch
            .iter()
            .filter(|c| self.always_cut.contains(&c.id))
            .map(|c| c.id)
            .collect_vec();

        let ctx = WeightContext {
            program,
            restricted: &self.restricted,
            always_cut: &self.always_cut,
            regime,
            branch_variables: partition.num_variables(),
        };

        let mut seed = None;
        let mut components = connected_components(cones.len(), &branch, &live);

        while components.len() < 2 {
            // (weight, branch constraint, local cone) of the cheapest cut so far
            let mut best: Option<(T, usize, usize)> = None;

            for (pos, candidate) in branch.iter().enumerate().filter(|(pos, _)| live[*pos]) {
                let constraint = program.constraint(candidate.id)?;
                for &k in &candidate.cones {
                    let w = self
                        .strategy
                        .weight(&ctx, constraint, program.cone(cones[k])?)?;
                    log::trace!("weight of {} at {}: {:e}", candidate.id, cones[k], w);

                    if w.is_finite() && best.map_or(true, |(bw, _, _)| w < bw) {
                        best = Some((w, pos, k));
                    }
                }
            }

            let (_, pos, k) = match best {
                Some(best) => best,
                None => return Ok(None),
            };
            live[pos] = false;
            cut.push(branch[pos].id);
            seed = Some(k);
            components = connected_components(cones.len(), &branch, &live);
        }

        // tentative cuts lying inside a single component are restored
        let mut component_of = vec![0; cones.len()];
        for (i, comp) in components.iter().enumerate() {
            for &k in comp {
                component_of[k] = i;
            }
        }
        let mut restored = HashSet::new();
        for (pos, c) in branch.iter().enumerate() {
            if live[pos] || self.always_cut.contains(&c.id) {
                continue;
            }
            if c.cones.iter().map(|&k| component_of[k]).all_equal() {
                live[pos] = true;
                restored.insert(c.id);
            }
        }
        cut.retain(|id| !restored.contains(id));

        // deal the components to two sides
        let first = seed
            .and_then(|k| components.iter().position(|comp| comp.contains(&k)))
            .unwrap_or(0);
        let order = std::iter::once(first).chain((0..components.len()).filter(|&i| i != first));
        let mut side_of = vec![0; cones.len()];
        let mut sizes = [0usize; 2];
        for (n, i) in order.enumerate() {
            // seed on side A, then the smaller side with ties to B
            let side = if n == 0 || sizes[0] < sizes[1] { 0 } else { 1 };
            for &k in &components[i] {
                side_of[k] = side;
            }
            sizes[side] += components[i].iter().map(|&k| dims[k]).sum::<usize>();
        }

        let mut side_cones: [Vec<ConeId>; 2] = [Vec::new(), Vec::new()];
        for (k, &id) in cones.iter().enumerate() {
            side_cones[side_of[k]].push(id);
        }
        let mut side_constraints: [Vec<ConstraintId>; 2] = [Vec::new(), Vec::new()];
        for (c, _) in branch.iter().zip(&live).filter(|(_, &l)| l) {
            if let Some(&k) = c.cones.first() {
                side_constraints[side_of[k]].push(c.id);
            }
        }

        let [cones_a, cones_b] = side_cones;
        let [constraints_a, constraints_b] = side_constraints;
        let sides = [
            Partition::new(cones_a, constraints_a, sizes[0]),
            Partition::new(cones_b, constraints_b, sizes[1]),
        ];

        Ok(Some(Split { sides, cut }))
    }
}

// groups of branch-local cones linked through live constraints
fn connected_components(n: usize, branch: &[BranchConstraint], live: &[bool]) -> Vec<Vec<usize>> {
    let mut dsu = DisjointSetUnion::new(n);
    for (c, _) in branch.iter().zip(live).filter(|(_, &l)| l) {
        if let Some((&first, rest)) = c.cones.split_first() {
            for &k in rest {
                dsu.union(first, k);
            }
        }
    }
    dsu.sets()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::*;

    fn leaf_settings() -> PartitionerSettings {
        PartitionerSettingsBuilder::default()
            .min_partition_variables(1)
            .build()
            .unwrap()
    }

    fn orthants(p: &mut ConicProgram<f64>, objective: &[f64]) -> Vec<(ConeId, VariableId)> {
        objective
            .iter()
            .map(|&c| {
                let k = p.add_cone(ConeKind::NonNegativeOrthant, &[c]).unwrap();
                (k, p.cone(k).unwrap().variables()[0].id())
            })
            .collect()
    }

    #[test]
    fn cut_separates_two_orthants() {
        let mut p = ConicProgram::<f64>::new();
        let v = orthants(&mut p, &[3.0, -5.0]);
        let c = p.add_constraint(&[(v[0].1, 1.0), (v[1].1, 1.0)], 1.0).unwrap();

        let mut partitioner = HierarchicalPartitioner::new(ObjectiveCoefficientWeighting::new());
        let tree = partitioner.partition(&p, &leaf_settings()).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root().cut(), &[c]);
        // the cheaper cut sits next to the second cone, which seeds side A
        let a = tree.node(1).unwrap().partition();
        let b = tree.node(2).unwrap().partition();
        assert_eq!(a.cones(), &[v[1].0]);
        assert_eq!(b.cones(), &[v[0].0]);
        assert!(a.constraints().is_empty() && b.constraints().is_empty());
    }

    #[test]
    fn disconnected_branch_splits_without_cut() {
        let mut p = ConicProgram::<f64>::new();
        let v = orthants(&mut p, &[1.0, 1.0, 1.0]);
        let c = p.add_constraint(&[(v[1].1, 1.0), (v[2].1, 1.0)], 1.0).unwrap();

        let mut partitioner = HierarchicalPartitioner::new(ObjectiveCoefficientWeighting::new());
        let settings = PartitionerSettingsBuilder::default()
            .max_depth(1)
            .build()
            .unwrap();
        let tree = partitioner.partition(&p, &settings).unwrap();

        assert_eq!(tree.len(), 3);
        assert!(tree.root().cut().is_empty());
        assert_eq!(tree.node(1).unwrap().partition().cones(), &[v[0].0]);
        assert_eq!(tree.node(2).unwrap().partition().cones(), &[v[1].0, v[2].0]);
        assert_eq!(tree.node(2).unwrap().partition().constraints(), &[c]);
    }

    #[test]
    fn always_cut_constraints_go_first() {
        let mut p = ConicProgram::<f64>::new();
        let v = orthants(&mut p, &[1.0, 2.0, 3.0]);
        let c01 = p.add_constraint(&[(v[0].1, 1.0), (v[1].1, 1.0)], 1.0).unwrap();
        let c12 = p.add_constraint(&[(v[1].1, 1.0), (v[2].1, 1.0)], 1.0).unwrap();

        let mut partitioner = HierarchicalPartitioner::new(ObjectiveCoefficientWeighting::new())
            .with_always_cut_constraints([c12]);
        let settings = PartitionerSettingsBuilder::default()
            .max_depth(1)
            .build()
            .unwrap();
        let tree = partitioner.partition(&p, &settings).unwrap();

        assert_eq!(tree.root().cut(), &[c12]);
        assert_eq!(tree.node(1).unwrap().partition().cones(), &[v[0].0, v[1].0]);
        assert_eq!(tree.node(1).unwrap().partition().constraints(), &[c01]);
        assert_eq!(tree.node(2).unwrap().partition().cones(), &[v[2].0]);
    }

    #[test]
    fn non_separating_cuts_are_restored() {
        let mut p = ConicProgram::<f64>::new();
        let v = orthants(&mut p, &[1.0, 1.0, 1.0]);
        let c0 = p.add_constraint(&[(v[0].1, 1.0), (v[1].1, 1.0)], 1.0).unwrap();
        let c1 = p.add_constraint(&[(v[0].1, 1.0), (v[1].1, -1.0)], 0.0).unwrap();
        let c2 = p.add_constraint(&[(v[1].1, 1.0), (v[2].1, 1.0)], 1.0).unwrap();

        // c0 is cut first but leaves the cones joined through c1, then c2
        // separates the third cone.  c0 stays inside the first half
        let mut partitioner = HierarchicalPartitioner::new(SizeBalancingWeighting::<f64>::new())
            .with_restricted_constraints([c1]);
        let settings = PartitionerSettingsBuilder::default()
            .max_depth(1)
            .build()
            .unwrap();
        let tree = partitioner.partition(&p, &settings).unwrap();

        assert_eq!(tree.root().cut(), &[c2]);
        let a = tree.node(1).unwrap().partition();
        assert_eq!(a.cones(), &[v[0].0, v[1].0]);
        assert_eq!(a.constraints(), &[c0, c1]);
        assert_eq!(tree.node(2).unwrap().partition().cones(), &[v[2].0]);
        assert_eq!(partitioner.strategy().cuts(), 1);
    }

    #[test]
    fn ineligible_cuts_leave_a_leaf() {
        let mut p = ConicProgram::<f64>::new();
        let v = orthants(&mut p, &[1.0, 1.0]);
        let k = p.add_cone(ConeKind::SecondOrder, &[0.0, 0.0, 1.0]).unwrap();
        let t = p.cone(k).unwrap().variables()[2].id();
        p.add_constraint(&[(v[0].1, 1.0), (v[1].1, 1.0)], 1.0).unwrap();
        p.add_constraint(&[(v[0].1, 1.0), (t, -1.0)], 0.0).unwrap();
        p.add_constraint(&[(v[1].1, 1.0), (t, -1.0)], 0.0).unwrap();

        // cutting the first constraint alone keeps the cones connected and
        // nothing else is eligible, so the tentative cut is dropped
        let mut partitioner = HierarchicalPartitioner::new(ObjectiveCoefficientWeighting::new());
        let tree = partitioner.partition(&p, &leaf_settings()).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.cut_constraints().is_empty());
        assert_eq!(tree.root().partition().num_variables(), 5);
    }

    #[test]
    fn unsupported_cone_aborts() {
        let mut p = ConicProgram::<f64>::new();
        let v = orthants(&mut p, &[1.0, 1.0]);
        let r = p.add_cone(ConeKind::RotatedSecondOrder, &[0.0; 3]).unwrap();
        let w = p.cone(r).unwrap().variables()[0].id();
        p.add_constraint(&[(v[0].1, 1.0), (v[1].1, 1.0), (w, 1.0)], 0.0)
            .unwrap();

        let mut partitioner = HierarchicalPartitioner::new(ObjectiveCoefficientWeighting::new());
        assert_eq!(
            partitioner.partition(&p, &leaf_settings()),
            Err(PartitionError::UnsupportedCone(ConeKind::RotatedSecondOrder))
        );
    }

    #[test]
    fn accepted_splits_reach_the_strategy() {
        let mut p = ConicProgram::<f64>::new();
        let v = orthants(&mut p, &[1.0, 1.0, 1.0, 1.0]);
        for pair in v.windows(2) {
            p.add_constraint(&[(pair[0].1, 1.0), (pair[1].1, 1.0)], 1.0)
                .unwrap();
        }

        let mut partitioner = HierarchicalPartitioner::new(SizeBalancingWeighting::<f64>::new());
        let tree = partitioner.partition(&p, &leaf_settings()).unwrap();

        assert_eq!(tree.num_leaves(), 4);
        assert_eq!(tree.cut_constraints().len(), 3);
        let stats = partitioner.strategy();
        assert_eq!(stats.splits(), 3);
        assert_eq!(stats.cuts(), 3);
        assert!(stats.largest_child() <= 3);
    }

    #[test]
    fn closure_termination() {
        let mut p = ConicProgram::<f64>::new();
        let v = orthants(&mut p, &[1.0, 2.0]);
        p.add_constraint(&[(v[0].1, 1.0), (v[1].1, 1.0)], 1.0).unwrap();

        let mut partitioner = HierarchicalPartitioner::new(Weighting::from(
            ObjectiveCoefficientWeighting::<f64>::new(),
        ));
        let stop = |_: &Partition, _: usize| true;
        assert_eq!(partitioner.partition(&p, &stop).unwrap().len(), 1);
    }
}
