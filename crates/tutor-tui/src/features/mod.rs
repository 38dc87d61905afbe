//! Feature slices. Each owns its state, key handling and rendering.

pub mod input;
pub mod panels;
pub mod statusline;
pub mod transcript;
