//! Input key handling.
//!
//! The slice only edits its own buffers. Anything that touches the session
//! is returned as an [`InputAction`] for the reducer to apply.

use crossterm::event::{KeyCode, KeyEvent};

use super::state::{Focus, InputState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    None,
    /// Enter in the question box.
    Ask(String),
    /// Enter in the answer box.
    Submit(String),
    /// Scratchboard contents changed.
    ScratchEdited(String),
}

pub fn handle_key(input: &mut InputState, key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Tab => {
            input.focus = input.focus.next();
            InputAction::None
        }
        KeyCode::BackTab => {
            input.focus = input.focus.prev();
            InputAction::None
        }
        KeyCode::Enter => match input.focus {
            Focus::Question => InputAction::Ask(input.question.text()),
            Focus::Answer => InputAction::Submit(input.answer.text()),
            Focus::Scratch => {
                input.scratch.insert_newline();
                InputAction::ScratchEdited(input.scratch.text())
            }
        },
        _ => {
            let changed = input.focused_mut().input(key);
            scratch_action(input, changed)
        }
    }
}

/// Inserts pasted text into the focused field. Single-line fields get
/// newlines flattened to spaces.
pub fn handle_paste(input: &mut InputState, text: &str) -> InputAction {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if input.focus == Focus::Scratch {
        input.scratch.insert_str(&text);
    } else {
        input.focused_mut().insert_str(&text.replace('\n', " "));
    }
    scratch_action(input, !text.is_empty())
}

fn scratch_action(input: &InputState, changed: bool) -> InputAction {
    if changed && input.focus == Focus::Scratch {
        InputAction::ScratchEdited(input.scratch.text())
    } else {
        InputAction::None
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(input: &mut InputState, code: KeyCode) -> InputAction {
        handle_key(input, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(input: &mut InputState, text: &str) {
        for ch in text.chars() {
            press(input, KeyCode::Char(ch));
        }
    }

    #[test]
    fn test_enter_asks_from_question_box() {
        let mut input = InputState::new();
        type_str(&mut input, "order?");
        assert_eq!(
            press(&mut input, KeyCode::Enter),
            InputAction::Ask("order?".to_string())
        );
    }

    #[test]
    fn test_focus_cycles_through_fields() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::Tab);
        assert_eq!(input.focus, Focus::Scratch);
        press(&mut input, KeyCode::Tab);
        assert_eq!(input.focus, Focus::Answer);
        press(&mut input, KeyCode::Tab);
        assert_eq!(input.focus, Focus::Question);
        press(&mut input, KeyCode::BackTab);
        assert_eq!(input.focus, Focus::Answer);
    }

    #[test]
    fn test_scratch_edits_are_reported() {
        let mut input = InputState::new();
        input.focus = Focus::Scratch;
        assert_eq!(
            press(&mut input, KeyCode::Char('5')),
            InputAction::ScratchEdited("5".to_string())
        );
        assert_eq!(
            press(&mut input, KeyCode::Enter),
            InputAction::ScratchEdited("5\n".to_string())
        );
        assert_eq!(press(&mut input, KeyCode::Left), InputAction::None);
    }

    #[test]
    fn test_enter_submits_from_answer_box() {
        let mut input = InputState::new();
        input.focus = Focus::Answer;
        type_str(&mut input, "42");
        assert_eq!(
            press(&mut input, KeyCode::Enter),
            InputAction::Submit("42".to_string())
        );
    }

    #[test]
    fn test_paste_flattens_single_line_fields() {
        let mut input = InputState::new();
        assert_eq!(handle_paste(&mut input, "a\r\nb"), InputAction::None);
        assert_eq!(input.question.text(), "a b");

        input.focus = Focus::Scratch;
        assert_eq!(
            handle_paste(&mut input, "x\ny"),
            InputAction::ScratchEdited("x\ny".to_string())
        );
    }
}
