//! Input/output helpers.
//!
//! - combined-table CSV export (`export`)

pub mod export;

pub use export::*;
