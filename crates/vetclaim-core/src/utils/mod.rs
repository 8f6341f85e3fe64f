//! Utility functions for string formatting and manipulation.

pub mod format;

pub use format::{csv_escape, file_stem_for, format_date, format_usd, truncate_string};
