//! Terminal plotting.

pub mod ascii;

pub use ascii::{marker, render_ascii_chart};
