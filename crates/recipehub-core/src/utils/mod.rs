//! Utility functions for string formatting and splitting.

pub mod format;

pub use format::{age_display, format_date, split_trimmed, truncate_string};
