//! Shared helpers used across feature slices.

pub mod text;

pub use text::{format_clock, truncate_start_with_ellipsis, truncate_with_ellipsis, wrap_text};
