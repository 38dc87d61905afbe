//! CLI command handlers.

pub mod config;
pub mod questions;
pub mod session;
