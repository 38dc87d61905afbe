//! Transcript rendering.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tutor_core::session::SessionController;
use tutor_core::transcript::{Message, Sender};

use super::state::TranscriptView;
use crate::common::wrap_text;

/// Typing indicator appended to a message that is still being revealed.
const CARET: &str = "▌";

/// Builds the wrapped lines for every message.
pub fn transcript_lines(
    session: &SessionController,
    view: &TranscriptView,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in session.transcript().messages() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(header_line(session, message));

        let text = view.visible_text(message);
        let style = body_style(message);
        let mut body = wrap_text(text, width.saturating_sub(2));
        if view.is_typing(message) {
            match body.last_mut() {
                Some(last) => last.push_str(CARET),
                None => body.push(CARET.to_string()),
            }
        }
        lines.extend(
            body.into_iter()
                .map(|line| Line::from(vec![Span::raw("  "), Span::styled(line, style)])),
        );
    }
    lines
}

fn header_line(session: &SessionController, message: &Message) -> Line<'static> {
    match message.sender {
        Sender::User => Line::from(Span::styled(
            "You",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Sender::Agent => {
            let agent = message.agent_id.as_deref().and_then(|id| session.agent(id));
            let (name, role) = agent.map_or(("Agent", ""), |a| (a.name.as_str(), a.role.as_str()));
            let color = agent_color(session, message.agent_id.as_deref());
            let mut spans = vec![Span::styled(
                name.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )];
            if !role.is_empty() {
                spans.push(Span::styled(
                    format!(" · {role}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
    }
}

fn body_style(message: &Message) -> Style {
    match message.sender {
        Sender::User => Style::default().fg(Color::White),
        Sender::Agent => Style::default(),
    }
}

/// Stable color per agent: instructor first, then roster order.
pub fn agent_color(session: &SessionController, agent_id: Option<&str>) -> Color {
    const ROSTER_COLORS: [Color; 4] = [Color::Magenta, Color::Blue, Color::Yellow, Color::Red];
    let Some(id) = agent_id else {
        return Color::Gray;
    };
    if id == session.instructor().id {
        return Color::Cyan;
    }
    session
        .agents()
        .iter()
        .position(|a| a.id == id)
        .map_or(Color::Gray, |idx| ROSTER_COLORS[idx % ROSTER_COLORS.len()])
}

/// Renders the transcript pane, bottom-aligned and following the latest
/// message unless scrolled up.
pub fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    session: &SessionController,
    view: &TranscriptView,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Session ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    let lines = transcript_lines(session, view, inner.width as usize);
    let max_offset = lines.len().saturating_sub(height);
    let offset = view.scroll.offset_from_bottom().min(max_offset);
    let start = lines.len().saturating_sub(height + offset);

    let mut visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
    if visible.len() < height {
        let mut padded = vec![Line::default(); height - visible.len()];
        padded.append(&mut visible);
        visible = padded;
    }
    frame.render_widget(Paragraph::new(visible), inner);
}
