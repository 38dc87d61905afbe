//! Input feature slice: question box, scratchboard and answer box.
//!
//! - `text_buffer.rs`: line-based editing buffer
//! - `state.rs`: field buffers and focus
//! - `update.rs`: key handling, producing `InputAction`s
//! - `render.rs`: field rendering

mod render;
mod state;
mod text_buffer;
mod update;

pub use render::{SINGLE_LINE_HEIGHT, render_field, scratch_height};
pub use state::{Focus, InputState};
pub use text_buffer::{CursorMove, TextBuffer};
pub use update::{InputAction, handle_key, handle_paste};
