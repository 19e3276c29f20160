mod common;

use conic_partition::partition::*;
use conic_partition::program::*;
use std::collections::HashSet;

fn settings() -> PartitionerSettings {
    PartitionerSettingsBuilder::default()
        .min_partition_variables(1)
        .build()
        .unwrap()
}

fn sorted<T: Ord + Copy>(items: &[T]) -> Vec<T> {
    let mut v = items.to_vec();
    v.sort();
    v
}

fn check_covering(program: &ConicProgram<f64>, tree: &PartitionTree) {
    let root = tree.root().partition();
    assert_eq!(root.num_variables(), program.num_variables());
    assert_eq!(root.num_cones(), program.num_cones());

    for node in tree.nodes() {
        let parent = node.partition();
        // every node is a valid sub-program of the root
        let sub = parent.subprogram(program).unwrap();
        assert_eq!(sub.num_variables(), parent.num_variables());

        if node.is_leaf() {
            assert!(node.cut().is_empty());
            continue;
        }
        let a = tree.node(node.children()[0]).unwrap().partition();
        let b = tree.node(node.children()[1]).unwrap().partition();
        assert!(a.num_cones() > 0 && b.num_cones() > 0);

        let cones = [a.cones(), b.cones()].concat();
        assert_eq!(sorted(&cones), sorted(parent.cones()));
        assert_eq!(a.num_variables() + b.num_variables(), parent.num_variables());

        let constraints = [a.constraints(), b.constraints(), node.cut()].concat();
        assert_eq!(sorted(&constraints), sorted(parent.constraints()));
    }

    let mut leaf_cones: Vec<ConeId> = tree
        .leaves()
        .flat_map(|n| n.partition().cones().to_vec())
        .collect();
    leaf_cones.sort();
    let mut all: Vec<ConeId> = program.cones().map(|k| k.id()).collect();
    all.sort();
    assert_eq!(leaf_cones, all);
}

#[test]
fn test_splits_are_disjoint_coverings() {
    for seed in 0..100 {
        let program = common::random_program(seed, false);
        let mut partitioner = HierarchicalPartitioner::new(ObjectiveCoefficientWeighting::new());
        let tree = partitioner.partition(&program, &settings()).unwrap();
        check_covering(&program, &tree);

        let program = common::random_program(seed, true);
        let mut partitioner = HierarchicalPartitioner::new(SizeBalancingWeighting::new());
        let tree = partitioner.partition(&program, &settings()).unwrap();
        check_covering(&program, &tree);
        assert_eq!(partitioner.strategy().splits(), tree.len() / 2);
    }
}

#[test]
fn test_partitioning_is_reproducible() {
    for seed in 0..50 {
        let first = common::random_program(seed, false);
        let second = common::random_program(seed, false);

        let always_cut: Vec<ConstraintId> = first.constraints().map(|c| c.id()).step_by(3).collect();
        let run = |program: &ConicProgram<f64>| {
            HierarchicalPartitioner::new(Weighting::from(ObjectiveCoefficientWeighting::new()))
                .with_always_cut_constraints(always_cut.iter().copied())
                .with_initial_regime(seed as usize)
                .partition(program, &settings())
                .unwrap()
        };

        assert_eq!(run(&first), run(&second));
        assert_eq!(run(&first), run(&first));
    }
}

#[test]
fn test_always_cut_constraints_never_reach_children() {
    for seed in 0..50 {
        let program = common::random_program(seed, false);
        let always_cut: HashSet<ConstraintId> =
            program.constraints().map(|c| c.id()).step_by(2).collect();

        let mut partitioner = HierarchicalPartitioner::new(ObjectiveCoefficientWeighting::new())
            .with_always_cut_constraints(always_cut.iter().copied());
        let tree = partitioner.partition(&program, &settings()).unwrap();

        for node in tree.nodes().filter(|n| n.depth() > 0) {
            assert!(node
                .partition()
                .constraints()
                .iter()
                .all(|c| !always_cut.contains(c)));
        }
    }
}

#[test]
fn test_depth_limit() {
    for seed in 0..30 {
        let program = common::random_program(seed, false);
        let settings = PartitionerSettingsBuilder::default()
            .max_depth(2)
            .min_partition_variables(0)
            .build()
            .unwrap();
        let mut partitioner = HierarchicalPartitioner::new(SizeBalancingWeighting::<f64>::new());
        let tree = partitioner.partition(&program, &settings).unwrap();
        assert!(tree.depth() <= 2);
        assert!(tree.num_leaves() <= 4);
    }
}

#[test]
fn test_empty_program_is_a_single_leaf() {
    let program = ConicProgram::<f64>::new();
    let mut partitioner = HierarchicalPartitioner::new(ObjectiveCoefficientWeighting::new());
    let tree = partitioner.partition(&program, &settings()).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root().partition().num_variables(), 0);
}
