//! Input field rendering.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use super::state::{Focus, InputState};
use crate::common::truncate_start_with_ellipsis;

/// Rows used by a single-line field including its border.
pub const SINGLE_LINE_HEIGHT: u16 = 3;

/// Scratchboard height bounds including the border.
const SCRATCH_MIN_HEIGHT: u16 = 4;
const SCRATCH_MAX_HEIGHT: u16 = 10;

/// Height for the scratchboard: grows with content up to a cap.
pub fn scratch_height(input: &InputState, available: u16) -> u16 {
    let wanted = input.scratch.lines().len() as u16 + 2;
    wanted
        .clamp(SCRATCH_MIN_HEIGHT, SCRATCH_MAX_HEIGHT)
        .min(available / 3)
        .max(3)
}

/// Renders one input field. Disabled fields are dimmed and never take the
/// cursor.
pub fn render_field(frame: &mut Frame, area: Rect, input: &InputState, field: Focus, enabled: bool) {
    let focused = input.focus == field && enabled;
    let border_color = match (focused, enabled) {
        (true, _) => Color::Cyan,
        (false, true) => Color::Gray,
        (false, false) => Color::DarkGray,
    };
    let title = if enabled {
        format!(" {} ", field.title())
    } else {
        format!(" {} (closed) ", field.title())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(title, Style::default().fg(border_color)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let text_style = if enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let buffer = input.buffer(field);

    match field {
        Focus::Scratch => {
            let (row, col) = buffer.cursor();
            let height = inner.height as usize;
            let top = (row + 1).saturating_sub(height);
            let lines: Vec<Line> = buffer
                .lines()
                .iter()
                .skip(top)
                .take(height)
                .map(|line| Line::from(Span::styled(line.clone(), text_style)))
                .collect();
            frame.render_widget(Paragraph::new(lines), inner);

            if focused {
                let line = &buffer.lines()[row];
                let prefix: String = line.chars().take(col).collect();
                let x = inner.x + (prefix.width() as u16).min(inner.width.saturating_sub(1));
                let y = inner.y + (row - top) as u16;
                frame.set_cursor_position(Position::new(x, y));
            }
        }
        Focus::Question | Focus::Answer => {
            let max_width = inner.width.saturating_sub(1) as usize;
            let value = buffer.text();
            let (content, style) = if value.is_empty() {
                (placeholder(field).to_string(), Style::default().fg(Color::DarkGray))
            } else {
                (truncate_start_with_ellipsis(&value, max_width), text_style)
            };
            frame.render_widget(Paragraph::new(Line::from(Span::styled(content, style))), inner);

            if focused {
                let (_, col) = buffer.cursor();
                let prefix: String = value.chars().take(col).collect();
                let x = inner.x + (prefix.width() as u16).min(max_width as u16);
                frame.set_cursor_position(Position::new(x, inner.y));
            }
        }
    }
}

fn placeholder(field: Focus) -> &'static str {
    match field {
        Focus::Question => "Type a question and press Enter",
        Focus::Answer => "Type your answer and press Enter to submit",
        Focus::Scratch => "",
    }
}
