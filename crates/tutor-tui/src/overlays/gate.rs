//! Entry gate shown before the first round.
//!
//! Two steps, in order:
//! 1. CAPTCHA: type the displayed code exactly. A wrong entry regenerates
//!    the code and clears the field.
//! 2. Consent: toggle agreement, then proceed.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;
use rand::rngs::StdRng;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::render_utils::{InputHint, calculate_overlay_area, render_hints, render_overlay_container};

const CAPTCHA_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const CONSENT_SUMMARY: &[&str] = &[
    "This practice session is part of a study on learning with AI tutors.",
    "Your questions, scratch work and answers may be recorded.",
    "",
    "By proceeding you confirm that:",
    "• you have read and understood this information;",
    "• you are at least 18 years of age;",
    "• you consent to participation and data collection;",
    "• you may withdraw at any time by quitting.",
];

/// Generates a random code from the 62-symbol alphanumeric alphabet.
pub fn generate_captcha<R: Rng + ?Sized>(length: usize, rng: &mut R) -> String {
    (0..length)
        .map(|_| char::from(CAPTCHA_ALPHABET[rng.gen_range(0..CAPTCHA_ALPHABET.len())]))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStep {
    Captcha { code: String, entry: String },
    Consent { agreed: bool },
}

/// What a key press did to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Stay,
    /// Both steps done; the session may start.
    Passed,
    /// The student backed out.
    Quit,
}

#[derive(Debug)]
pub struct GateState {
    step: GateStep,
    captcha_length: usize,
    error: Option<String>,
    rng: StdRng,
}

impl GateState {
    pub fn new(captcha_length: usize, mut rng: StdRng) -> Self {
        let code = generate_captcha(captcha_length, &mut rng);
        Self {
            step: GateStep::Captcha {
                code,
                entry: String::new(),
            },
            captcha_length,
            error: None,
            rng,
        }
    }

    pub fn step(&self) -> &GateStep {
        &self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> GateOutcome {
        if key.code == KeyCode::Esc {
            return GateOutcome::Quit;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return GateOutcome::Stay;
        }
        if key.code != KeyCode::Enter {
            self.error = None;
        }

        match &mut self.step {
            GateStep::Captcha { code, entry } => match key.code {
                KeyCode::Enter => {
                    if entry == code {
                        tracing::debug!("captcha passed");
                        self.step = GateStep::Consent { agreed: false };
                        self.error = None;
                    } else {
                        tracing::debug!("captcha mismatch, regenerating");
                        *code = generate_captcha(self.captcha_length, &mut self.rng);
                        entry.clear();
                        self.error = Some("Code is incorrect. Please try the new one.".to_string());
                    }
                    GateOutcome::Stay
                }
                KeyCode::Backspace => {
                    entry.pop();
                    GateOutcome::Stay
                }
                KeyCode::Char(c) if !c.is_whitespace() => {
                    entry.push(c);
                    GateOutcome::Stay
                }
                _ => GateOutcome::Stay,
            },
            GateStep::Consent { agreed } => match key.code {
                KeyCode::Char(' ' | 'y' | 'Y') | KeyCode::Tab => {
                    *agreed = !*agreed;
                    GateOutcome::Stay
                }
                KeyCode::Enter if *agreed => GateOutcome::Passed,
                KeyCode::Enter => {
                    self.error = Some("Please agree to the terms to continue.".to_string());
                    GateOutcome::Stay
                }
                _ => GateOutcome::Stay,
            },
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let height = match self.step {
            GateStep::Captcha { .. } => 11,
            GateStep::Consent { .. } => CONSENT_SUMMARY.len() as u16 + 8,
        };
        let popup = calculate_overlay_area(area, 64, height);
        render_overlay_container(frame, popup, "Before you begin", Color::Cyan);

        let inner = Rect::new(
            popup.x + 2,
            popup.y + 1,
            popup.width.saturating_sub(4),
            popup.height.saturating_sub(2),
        );

        let (mut lines, hints) = match &self.step {
            GateStep::Captcha { code, entry } => (
                captcha_lines(code, entry),
                [InputHint::new("Enter", "check"), InputHint::new("Esc", "quit")],
            ),
            GateStep::Consent { agreed } => (
                consent_lines(*agreed),
                [InputHint::new("Space", "toggle"), InputHint::new("Enter", "proceed")],
            ),
        };
        if let Some(error) = &self.error {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        render_hints(frame, inner, &hints, Color::Cyan);
    }
}

fn captcha_lines(code: &str, entry: &str) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    // Spaced out so similar glyphs are easier to tell apart.
    let spaced: String = code
        .chars()
        .flat_map(|c| [c, ' '])
        .collect::<String>()
        .trim_end()
        .to_string();
    vec![
        Line::from(Span::styled("Step 1 of 2: type the code below", dim)),
        Line::default(),
        Line::from(Span::styled(
            format!("  {spaced}  "),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("> ", dim),
            Span::raw(entry.to_string()),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ]),
    ]
}

fn consent_lines(agreed: bool) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled("Step 2 of 2: participation consent", dim)),
        Line::default(),
    ];
    lines.extend(CONSENT_SUMMARY.iter().map(|text| Line::from(*text)));
    lines.push(Line::default());
    let mark = if agreed { "[x]" } else { "[ ]" };
    lines.push(Line::from(vec![
        Span::styled(
            mark,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" I agree to the terms and conditions"),
    ]));
    lines
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn gate() -> GateState {
        GateState::new(6, StdRng::seed_from_u64(17))
    }

    fn current_code(gate: &GateState) -> String {
        match gate.step() {
            GateStep::Captcha { code, .. } => code.clone(),
            GateStep::Consent { .. } => panic!("expected captcha step"),
        }
    }

    fn type_str(gate: &mut GateState, text: &str) {
        for ch in text.chars() {
            gate.handle_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_generated_code_uses_alphabet() {
        let mut rng = StdRng::seed_from_u64(1);
        let code = generate_captcha(6, &mut rng);
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| CAPTCHA_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_wrong_code_regenerates_and_clears() {
        let mut gate = gate();
        let first = current_code(&gate);
        type_str(&mut gate, "nope!");

        assert_eq!(gate.handle_key(key(KeyCode::Enter)), GateOutcome::Stay);
        match gate.step() {
            GateStep::Captcha { code, entry } => {
                assert!(entry.is_empty());
                assert_eq!(code.len(), 6);
                assert_ne!(*code, first);
            }
            GateStep::Consent { .. } => panic!("wrong code must not pass"),
        }
        assert!(gate.error().is_some());
    }

    #[test]
    fn test_captcha_is_case_sensitive() {
        let mut gate = GateState::new(4, StdRng::seed_from_u64(2));
        let code = current_code(&gate);
        let flipped: String = code
            .chars()
            .map(|c| {
                if c.is_ascii_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            })
            .collect();
        if flipped == code {
            return; // all digits
        }
        type_str(&mut gate, &flipped);
        gate.handle_key(key(KeyCode::Enter));
        assert!(matches!(gate.step(), GateStep::Captcha { .. }));
    }

    #[test]
    fn test_full_gate_flow() {
        let mut gate = gate();
        let code = current_code(&gate);
        type_str(&mut gate, &code);
        assert_eq!(gate.handle_key(key(KeyCode::Enter)), GateOutcome::Stay);
        assert_eq!(gate.step(), &GateStep::Consent { agreed: false });

        // Proceeding without agreement is refused.
        assert_eq!(gate.handle_key(key(KeyCode::Enter)), GateOutcome::Stay);
        assert!(gate.error().is_some());

        gate.handle_key(key(KeyCode::Char(' ')));
        assert!(gate.error().is_none());
        assert_eq!(gate.handle_key(key(KeyCode::Enter)), GateOutcome::Passed);
    }

    #[test]
    fn test_escape_quits() {
        let mut gate = gate();
        assert_eq!(gate.handle_key(key(KeyCode::Esc)), GateOutcome::Quit);
    }
}
