//! Hierarchical partitioning of conic programs.
//!
//! The [`HierarchicalPartitioner`] splits a [`ConicProgram`](crate::program::ConicProgram)
//! into a [`PartitionTree`] by cutting linear constraints.  Which constraint to cut is
//! decided by a [`WeightingStrategy`]; two are provided, [`ObjectiveCoefficientWeighting`]
//! and [`SizeBalancingWeighting`], and [`Weighting`] selects between them at runtime.

mod disjoint_set_union;
mod error;
mod partitioner;
mod settings;
mod tree;
mod weighting;

pub use error::*;
pub use partitioner::*;
pub use settings::*;
pub use tree::*;
pub use weighting::*;
