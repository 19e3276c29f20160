//! __conic_partition__ splits conic programs into a hierarchy of smaller
//! sub-programs by cutting linear constraints.  It works with programs of the form
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & c^T x\\\\\[2ex\]
//!  \text{subject to} & Ax = b \\\\\[1ex\]
//!         & x \in \mathcal{K}
//!  \end{array}
//! $$
//!
//! where the convex set $\mathcal{K}$ is a product of nonnegative orthant,
//! second order and rotated second order cones.
//!
//! ## Overview
//!
//! * [`program`]: the conic program model.  Cones own their variables, constraints
//!   refer to variables by id, and the matrix form `(A, b, c, x)` is checked out on
//!   demand while the program structure is frozen.
//!
//! * [`partition`]: the [`HierarchicalPartitioner`](partition::HierarchicalPartitioner)
//!   and its pluggable [`WeightingStrategy`](partition::WeightingStrategy), which
//!   prices every candidate cut.  The result is a [`PartitionTree`](partition::PartitionTree)
//!   whose leaves are disjoint and cover the program.
//!
//! * [`solver`]: the interface to conic solvers and drivers that solve the leaves of
//!   a partition tree, sequentially or in parallel, writing the solution back into
//!   the root program.
//!
//! * [`algebra`]: numeric traits and the sparse matrix type used for the matrix form.
//!
//! ## Features
//!
//! * `serde` (default): serialization of ids, settings and partition trees.
//! * `clarabel`: a solver backend built on the Clarabel interior point solver.
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// crate version
pub fn version() -> &'static str {
    VERSION
}

pub mod algebra;
pub mod partition;
pub mod program;
pub mod solver;
