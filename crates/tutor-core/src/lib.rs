//! Core tutor library (session controller, collaborators, config, logging).
//!
//! Everything here is UI-agnostic. The terminal front-end lives in `tutor-tui`
//! and drives [`session::SessionController`] through its intent methods.

pub mod agents;
pub mod bag;
pub mod config;
pub mod logging;
pub mod questions;
pub mod reveal;
pub mod script;
pub mod session;
pub mod transcript;
