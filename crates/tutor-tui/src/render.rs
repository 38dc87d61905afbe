//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::input::{self, Focus, SINGLE_LINE_HEIGHT};
use crate::panels::{self, MIN_WIDTH_FOR_PANELS, PANEL_WIDTH};
use crate::state::AppState;
use crate::statusline::{render_key_hints, render_status_line};
use crate::transcript::render_transcript;

/// Height of the status line and the key hint line.
const STATUS_HEIGHT: u16 = 1;
const HINTS_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let (main, side) = split_side_panel(area);
    if let Some(side) = side {
        panels::render_agent_panels(frame, side, &state.session);
    }

    let scratch_height = input::scratch_height(&state.input, main.height);
    let chunks = Layout::vertical([
        Constraint::Min(3),                       // Transcript
        Constraint::Length(scratch_height),       // Scratchboard
        Constraint::Length(SINGLE_LINE_HEIGHT),   // Question
        Constraint::Length(SINGLE_LINE_HEIGHT),   // Final answer
        Constraint::Length(STATUS_HEIGHT),        // Status line
        Constraint::Length(HINTS_HEIGHT),         // Key hints
    ])
    .split(main);

    render_transcript(frame, chunks[0], &state.session, &state.transcript);

    // Inputs stay editable only while the round accepts questions.
    let open = state.session.is_questioning_enabled() && app.overlay.is_none();
    input::render_field(frame, chunks[1], &state.input, Focus::Scratch, open);
    input::render_field(frame, chunks[2], &state.input, Focus::Question, open);
    input::render_field(frame, chunks[3], &state.input, Focus::Answer, open);

    render_status_line(frame, chunks[4], &state.session, &state.status);
    render_key_hints(frame, chunks[5]);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area);
    }
}

/// Splits off the agent panel column when the terminal is wide enough.
fn split_side_panel(area: Rect) -> (Rect, Option<Rect>) {
    if area.width < MIN_WIDTH_FOR_PANELS {
        return (area, None);
    }
    let chunks =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(PANEL_WIDTH)]).split(area);
    (chunks[0], Some(chunks[1]))
}
