//! Reporting utilities: plain-text tables and view summaries.

pub mod format;

pub use format::{NO_DATA_MESSAGE, NO_SELECTION_MESSAGE, format_table, format_view};
