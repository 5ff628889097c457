//! Derived echocardiographic parameters
//!
//! This crate computes the report's derived values from the entered
//! measurements:
//! - [`field::Field`] - Numeric form fields and their element ids
//! - [`measurements`] - Field values, form-text parsing, rounding
//! - [`formulas`] - The individual formulas (DuBois, Teichholz, ASE mass, Bernoulli)
//! - [`graph`] - Dependency-ordered evaluation and incremental recompute
//! - [`reference`] - Adult reference ranges

pub mod error;
pub mod field;
pub mod formulas;
pub mod graph;
pub mod measurements;
pub mod reference;

pub use error::*;
pub use field::*;
pub use formulas::{Calculation, standard_calculations};
pub use graph::*;
pub use measurements::*;
pub use reference::*;
