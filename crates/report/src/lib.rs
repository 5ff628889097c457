//! Report authoring helpers
//!
//! - [`templates`] - Template keys resolved to field text insertions
//! - [`session`] - The selected physician and physician lookup

pub mod error;
pub mod session;
pub mod templates;

pub use error::*;
pub use session::*;
pub use templates::*;
