//! Transcript feature slice.
//!
//! The session owns the messages; this slice owns how they are shown:
//! typewriter progress per revealing message and the scroll position.

mod render;
mod state;
mod update;

pub use render::{agent_color, render_transcript, transcript_lines};
pub use state::{ScrollState, TranscriptView};
pub use update::{advance_reveals, skip_reveals};
