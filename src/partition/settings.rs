use super::Partition;
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decides when a branch of the partition tree becomes a leaf without
/// trying to split it.
///
/// Implemented by [`PartitionerSettings`] and by any closure
/// `Fn(&Partition, usize) -> bool` taking the partition and its depth.
pub trait TerminationPredicate {
    fn should_terminate(&self, partition: &Partition, depth: usize) -> bool;
}

impl<F> TerminationPredicate for F
where
    F: Fn(&Partition, usize) -> bool,
{
    fn should_terminate(&self, partition: &Partition, depth: usize) -> bool {
        self(partition, depth)
    }
}

/// Settings for the [`HierarchicalPartitioner`](super::HierarchicalPartitioner)

#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PartitionerSettings {
    ///branches at this depth are not split further
    #[builder(default = "16")]
    pub max_depth: usize,

    ///partitions with at most this many variables are leaves
    #[builder(default = "2")]
    pub min_partition_variables: usize,

    ///odd/even counter value for the first split
    #[builder(default = "0")]
    pub initial_regime: usize,
}

impl Default for PartitionerSettings {
    fn default() -> PartitionerSettings {
        PartitionerSettingsBuilder::default().build().unwrap()
    }
}

impl TerminationPredicate for PartitionerSettings {
    fn should_terminate(&self, partition: &Partition, depth: usize) -> bool {
        depth >= self.max_depth || partition.num_variables() <= self.min_partition_variables
    }
}

#[test]
fn test_partitioner_settings() {
    let settings = PartitionerSettings::default();
    assert_eq!(settings.max_depth, 16);
    assert_eq!(settings.min_partition_variables, 2);
    assert_eq!(settings.initial_regime, 0);

    let settings = PartitionerSettingsBuilder::default()
        .max_depth(1)
        .build()
        .unwrap();
    let p = Partition::new(vec![], vec![], 10);
    assert!(!settings.should_terminate(&p, 0));
    assert!(settings.should_terminate(&p, 1));
    assert!(settings.should_terminate(&Partition::new(vec![], vec![], 2), 0));

    let never = |_: &Partition, _: usize| false;
    assert!(!never.should_terminate(&p, 100));
}
