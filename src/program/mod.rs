//! Conic program data model.
//!
//! A [`ConicProgram`] owns a collection of [`Cone`]s, each of which owns its
//! [`Variable`]s, and a collection of [`LinearConstraint`]s over those
//! variables.  Entities are identified by the typed ids [`VariableId`],
//! [`ConeId`] and [`ConstraintId`], which stay valid in every sub-program
//! obtained by [`restrict`](ConicProgram::restrict).

mod cones;
mod conicprogram;
mod constraint;
mod error;
mod variable;

pub use cones::*;
pub use conicprogram::*;
pub use constraint::*;
pub use error::*;
pub use variable::*;
