//! Input field state.

use super::text_buffer::TextBuffer;

/// Which field receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Question,
    Scratch,
    Answer,
}

impl Focus {
    const ORDER: [Focus; 3] = [Focus::Question, Focus::Scratch, Focus::Answer];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            Focus::Question => "Ask a question",
            Focus::Scratch => "Scratchboard",
            Focus::Answer => "Final answer",
        }
    }
}

#[derive(Debug, Default)]
pub struct InputState {
    pub focus: Focus,
    pub question: TextBuffer,
    pub scratch: TextBuffer,
    pub answer: TextBuffer,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self, focus: Focus) -> &TextBuffer {
        match focus {
            Focus::Question => &self.question,
            Focus::Scratch => &self.scratch,
            Focus::Answer => &self.answer,
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextBuffer {
        match self.focus {
            Focus::Question => &mut self.question,
            Focus::Scratch => &mut self.scratch,
            Focus::Answer => &mut self.answer,
        }
    }

    /// Clears every field and returns focus to the question box.
    pub fn reset_for_round(&mut self) {
        self.question.clear();
        self.scratch.clear();
        self.answer.clear();
        self.focus = Focus::Question;
    }
}
