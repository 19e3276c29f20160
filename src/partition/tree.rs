use crate::algebra::FloatT;
use crate::program::{ConeId, ConicProgram, ConstraintId, ProgramError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A set of cones of some root program together with the constraints
/// that live entirely inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Partition {
    cones: Vec<ConeId>,
    constraints: Vec<ConstraintId>,
    num_variables: usize,
}

impl Partition {
    pub(crate) fn new(
        cones: Vec<ConeId>,
        constraints: Vec<ConstraintId>,
        num_variables: usize,
    ) -> Self {
        Self {
            cones,
            constraints,
            num_variables,
        }
    }

    /// cones in root registration order
    pub fn cones(&self) -> &[ConeId] {
        &self.cones
    }

    /// uncut constraints in root registration order
    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_cones(&self) -> usize {
        self.cones.len()
    }

    /// The sub-program of `program` covered by this partition.  Ids are
    /// those of `program`.
    pub fn subprogram<T: FloatT>(
        &self,
        program: &ConicProgram<T>,
    ) -> Result<ConicProgram<T>, ProgramError> {
        program.restrict(&self.cones, &self.constraints)
    }
}

/// A node of a [`PartitionTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartitionNode {
    partition: Partition,
    depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    cut: Vec<ConstraintId>,
}

impl PartitionNode {
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// distance from the root, which has depth 0
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// indices of the child nodes, empty for a leaf
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// constraints cut when this node was split, in the order they were chosen
    pub fn cut(&self) -> &[ConstraintId] {
        &self.cut
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The binary tree of partitions produced by
/// [`HierarchicalPartitioner::partition`](super::HierarchicalPartitioner::partition).
///
/// Nodes are stored in creation order, so index 0 is the root and the
/// children of a node always follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    pub(crate) fn new(root: Partition) -> Self {
        let root = PartitionNode {
            partition: root,
            depth: 0,
            parent: None,
            children: Vec::new(),
            cut: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    // attach two children to a node, returning their indices
    pub(crate) fn split(
        &mut self,
        parent: usize,
        sides: [Partition; 2],
        cut: Vec<ConstraintId>,
    ) -> [usize; 2] {
        let depth = self.nodes[parent].depth + 1;
        let first = self.nodes.len();
        for partition in sides {
            self.nodes.push(PartitionNode {
                partition,
                depth,
                parent: Some(parent),
                children: Vec::new(),
                cut: Vec::new(),
            });
        }
        let node = &mut self.nodes[parent];
        node.children = vec![first, first + 1];
        node.cut = cut;
        [first, first + 1]
    }

    pub fn root(&self) -> &PartitionNode {
        &self.nodes[0]
    }

    pub fn node(&self, index: usize) -> Option<&PartitionNode> {
        self.nodes.get(index)
    }

    /// Number of nodes.  Never zero.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PartitionNode> {
        self.nodes.iter()
    }

    /// Leaves in creation order.  Their partitions are disjoint and
    /// together cover every cone of the root.
    pub fn leaves(&self) -> impl Iterator<Item = &PartitionNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    pub fn num_leaves(&self) -> usize {
        self.leaves().count()
    }

    /// All constraints cut anywhere in the tree, node by node
    pub fn cut_constraints(&self) -> Vec<ConstraintId> {
        self.nodes.iter().flat_map(|n| n.cut.iter().copied()).collect()
    }

    /// largest node depth
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

/// A split as reported to
/// [`WeightingStrategy::process_accepted_partition`](super::WeightingStrategy::process_accepted_partition).
#[derive(Debug, Clone, Copy)]
pub struct AcceptedSplit<'a> {
    /// the partition that was split
    pub parent: &'a Partition,
    /// the two halves
    pub children: [&'a Partition; 2],
    /// constraints cut to separate the halves
    pub cut: &'a [ConstraintId],
    /// depth of the parent
    pub depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(cones: &[usize], constraints: &[usize], num_variables: usize) -> Partition {
        Partition::new(
            cones.iter().map(|&k| ConeId(k)).collect(),
            constraints.iter().map(|&c| ConstraintId(c)).collect(),
            num_variables,
        )
    }

    #[test]
    fn tree_queries() {
        let mut tree = PartitionTree::new(partition(&[0, 1, 2], &[0, 1], 4));
        assert_eq!(tree.len(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.depth(), 0);

        let [a, b] = tree.split(
            0,
            [partition(&[0], &[], 1), partition(&[1, 2], &[1], 3)],
            vec![ConstraintId(0)],
        );
        let [c, d] = tree.split(b, [partition(&[1], &[], 1), partition(&[2], &[], 2)], vec![ConstraintId(1)]);

        assert_eq!((a, b, c, d), (1, 2, 3, 4));
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.node(c).unwrap().parent(), Some(b));
        assert_eq!(tree.root().children(), &[1, 2]);
        assert_eq!(tree.cut_constraints(), vec![ConstraintId(0), ConstraintId(1)]);

        let leaves: Vec<usize> = tree.leaves().map(|n| n.partition().num_variables()).collect();
        assert_eq!(leaves, vec![1, 1, 2]);
        assert_eq!(tree.num_leaves(), 3);
        assert!(tree.node(5).is_none());
    }
}
