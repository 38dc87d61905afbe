//! Modal overlays.
//!
//! While an overlay is open it receives every key press (except Ctrl+C,
//! which the reducer handles first) and is drawn on top of the session.

mod gate;
mod render_utils;

use crossterm::event::KeyEvent;
pub use gate::{GateOutcome, GateState, GateStep, generate_captcha};
use ratatui::Frame;
use ratatui::layout::Rect;

#[derive(Debug)]
pub enum Overlay {
    Gate(GateState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Gate(gate) => gate.render(frame, area),
        }
    }
}

/// Result of routing a key to the open overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayUpdate {
    Stay,
    /// Overlay finished successfully and should close.
    Close,
    Quit,
}

pub fn handle_overlay_key(overlay: &mut Overlay, key: KeyEvent) -> OverlayUpdate {
    match overlay {
        Overlay::Gate(gate) => match gate.handle_key(key) {
            GateOutcome::Stay => OverlayUpdate::Stay,
            GateOutcome::Passed => OverlayUpdate::Close,
            GateOutcome::Quit => OverlayUpdate::Quit,
        },
    }
}
