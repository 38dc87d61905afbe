//! Status line rendering: countdown, round, phase and the current notice.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tutor_core::session::{Phase, SessionController};

use super::state::{NoticeKind, StatusState};
use crate::common::{format_clock, truncate_with_ellipsis};

/// Countdown turns red at or below this many seconds.
const LOW_TIME_SECS: u32 = 30;

pub fn render_status_line(
    frame: &mut Frame,
    area: Rect,
    session: &SessionController,
    status: &StatusState,
) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = Vec::new();

    match session.round() {
        Some(round) => {
            let remaining = session.remaining_secs();
            let clock_style = if !session.is_timer_running() {
                Style::default().fg(Color::DarkGray)
            } else if remaining <= LOW_TIME_SECS {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            spans.push(Span::styled(format!(" ⏱ {}", format_clock(remaining)), clock_style));
            spans.push(Span::styled(format!("  round {}", round.number), dim));
            spans.push(Span::styled(
                format!("  {}", round.phase.label()),
                phase_style(round.phase),
            ));
        }
        None if status.is_loading() => spans.push(Span::styled(" loading questions…", dim)),
        None => spans.push(Span::styled(" waiting to start", dim)),
    }

    if let Some(notice) = status.notice() {
        let used: usize = spans.iter().map(Span::width).sum();
        let room = (area.width as usize).saturating_sub(used + 3);
        let style = match notice.kind {
            NoticeKind::Info => Style::default().fg(Color::Yellow),
            NoticeKind::Error => Style::default().fg(Color::Red),
        };
        spans.push(Span::styled("  │ ", dim));
        spans.push(Span::styled(truncate_with_ellipsis(&notice.text, room), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key hints shown under the status line.
pub fn render_key_hints(frame: &mut Frame, area: Rect) {
    const HINTS: [(&str, &str); 6] = [
        ("Tab", "switch field"),
        ("Enter", "ask / submit"),
        ("Esc", "skip typing"),
        ("Ctrl+N", "next problem"),
        ("Ctrl+R", "reload questions"),
        ("Ctrl+C", "quit"),
    ];
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, action)) in HINTS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn phase_style(phase: Phase) -> Style {
    match phase {
        Phase::Questioning => Style::default().fg(Color::Cyan),
        Phase::FinalAnswerPending | Phase::Evaluating => Style::default().fg(Color::Yellow),
        Phase::Complete => Style::default().fg(Color::Green),
    }
}
