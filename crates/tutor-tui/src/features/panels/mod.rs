//! Agent side panels.
//!
//! One panel per roster agent: name, role and the thoughts it recorded this
//! round, newest last.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tutor_core::agents::Agent;
use tutor_core::session::SessionController;

use crate::common::{truncate_with_ellipsis, wrap_text};
use crate::transcript::agent_color;

/// Minimum terminal width before the side panels are shown.
pub const MIN_WIDTH_FOR_PANELS: u16 = 90;

/// Width of the side panel column.
pub const PANEL_WIDTH: u16 = 34;

pub fn render_agent_panels(frame: &mut Frame, area: Rect, session: &SessionController) {
    let agents = session.agents();
    if agents.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, agents.len() as u32); agents.len()];
    let areas = Layout::vertical(constraints).split(area);
    for (agent, panel) in agents.iter().zip(areas.iter()) {
        let color = agent_color(session, Some(&agent.id));
        render_panel(frame, *panel, agent, color);
    }
}

fn render_panel(frame: &mut Frame, area: Rect, agent: &Agent, color: Color) {
    let title = truncate_with_ellipsis(&agent.name, area.width.saturating_sub(4) as usize);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = panel_lines(agent, inner.width as usize);
    let height = inner.height as usize;
    if lines.len() > height && height > 1 {
        // Role line stays pinned; older thoughts scroll off.
        let overflow = lines.len() - height;
        lines.drain(1..=overflow);
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Role line followed by each thought as `[kind] content`.
pub fn panel_lines(agent: &Agent, width: usize) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled(
        truncate_with_ellipsis(&agent.role, width),
        dim.add_modifier(Modifier::ITALIC),
    ))];

    if agent.thoughts.is_empty() {
        lines.push(Line::from(Span::styled("Listening…", dim)));
        return lines;
    }

    for thought in &agent.thoughts {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", thought.timestamp.format("%H:%M:%S")),
                dim,
            ),
            Span::styled(
                format!("[{}]", thought.kind.label()),
                Style::default().fg(Color::Yellow),
            ),
        ]));
        lines.extend(
            wrap_text(&thought.content, width)
                .into_iter()
                .map(|line| Line::from(Span::raw(line))),
        );
    }
    lines
}

#[cfg(test)]
mod tests {
    use tutor_core::agents::ThoughtKind;

    use super::*;

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_empty_panel_shows_role_and_placeholder() {
        let agent = Agent::new("agent1", "Logic Bot", "clyde.png", "Reasoning");
        assert_eq!(text(&panel_lines(&agent, 30)), vec!["Reasoning", "Listening…"]);
    }

    #[test]
    fn test_thoughts_are_listed_with_kind() {
        let mut agent = Agent::new("agent2", "Pattern Bot", "wade.png", "Patterns");
        agent.record_thought(0, "Does order matter?", ThoughtKind::Question);
        let lines = text(&panel_lines(&agent, 30));
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(&format!("[{}]", ThoughtKind::Question.label())));
        assert_eq!(lines[2], "Does order matter?");
    }
}
