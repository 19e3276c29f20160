//! Numeric types and sparse storage for conic programs.
//!
//! Every numeric container in this crate is generic over a floating point
//! type implementing [`FloatT`].  Constraint matrices are assembled in
//! standard compressed sparse column format as a [`CscMatrix`].

mod csc;
mod error_types;
mod floats;

pub use csc::*;
pub use error_types::*;
pub use floats::*;
