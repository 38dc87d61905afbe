//! Typewriter-style text reveal.
//!
//! A `TextReveal` exposes a growing prefix of its text, paced by a fixed
//! per-character delay. Callers drive it with elapsed time and read back a
//! [`RevealStep`] describing what happened in that step:
//! - `revealed > 0` is the per-character signal (keep the view scrolled)
//! - `completed` is raised exactly once per text assignment
//!
//! Characters are grapheme clusters, so a combined glyph never shows half-drawn.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

/// Outcome of one [`TextReveal::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealStep {
    /// Characters newly revealed in this step.
    pub revealed: usize,
    /// True only on the step that revealed the final character.
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct TextReveal {
    text: String,
    /// Byte offset just past each grapheme.
    ends: Vec<usize>,
    shown: usize,
    char_delay: Duration,
    carry: Duration,
    completed: bool,
}

impl TextReveal {
    pub fn new(text: impl Into<String>, char_delay: Duration) -> Self {
        let mut reveal = Self {
            text: String::new(),
            ends: Vec::new(),
            shown: 0,
            char_delay,
            carry: Duration::ZERO,
            completed: false,
        };
        reveal.restart(text);
        reveal
    }

    /// Replaces the text and resets progress to empty.
    pub fn restart(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.ends = self
            .text
            .grapheme_indices(true)
            .map(|(start, g)| start + g.len())
            .collect();
        self.shown = 0;
        self.carry = Duration::ZERO;
        self.completed = false;
    }

    /// The full text being revealed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The currently revealed prefix.
    pub fn visible(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.text[..self.ends[n - 1]],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Total characters (grapheme clusters) in the text.
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Advances the reveal by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) -> RevealStep {
        if self.completed {
            return RevealStep::default();
        }

        let remaining = self.len() - self.shown;
        let revealed = if self.char_delay.is_zero() {
            remaining
        } else {
            self.carry += elapsed;
            let due = (self.carry.as_nanos() / self.char_delay.as_nanos()) as usize;
            let revealed = due.min(remaining);
            if revealed == remaining {
                self.carry = Duration::ZERO;
            } else {
                self.carry -= self.char_delay * revealed as u32;
            }
            revealed
        };

        self.shown += revealed;
        self.finish_step(revealed)
    }

    /// Reveals the rest of the text immediately.
    pub fn skip(&mut self) -> RevealStep {
        if self.completed {
            return RevealStep::default();
        }
        let revealed = self.len() - self.shown;
        self.shown = self.len();
        self.carry = Duration::ZERO;
        self.finish_step(revealed)
    }

    fn finish_step(&mut self, revealed: usize) -> RevealStep {
        let completed = self.shown == self.len();
        if completed {
            self.completed = true;
        }
        RevealStep {
            revealed,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(30);

    #[test]
    fn test_reveals_one_char_per_delay() {
        let mut reveal = TextReveal::new("abc", DELAY);
        assert_eq!(reveal.visible(), "");

        let step = reveal.advance(Duration::from_millis(29));
        assert_eq!(step.revealed, 0);
        assert_eq!(reveal.visible(), "");

        let step = reveal.advance(Duration::from_millis(1));
        assert_eq!(step.revealed, 1);
        assert!(!step.completed);
        assert_eq!(reveal.visible(), "a");

        let step = reveal.advance(Duration::from_millis(60));
        assert_eq!(step.revealed, 2);
        assert!(step.completed);
        assert_eq!(reveal.visible(), "abc");
    }

    #[test]
    fn test_completion_fires_once() {
        let mut reveal = TextReveal::new("hi", DELAY);
        let completions = (0..10)
            .map(|_| reveal.advance(Duration::from_millis(100)))
            .filter(|step| step.completed)
            .count();
        assert_eq!(completions, 1);
        assert!(reveal.is_complete());
    }

    #[test]
    fn test_empty_text_completes_on_first_advance() {
        let mut reveal = TextReveal::new("", DELAY);
        let step = reveal.advance(Duration::ZERO);
        assert_eq!(
            step,
            RevealStep {
                revealed: 0,
                completed: true
            }
        );
        assert_eq!(reveal.advance(Duration::ZERO), RevealStep::default());
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut reveal = TextReveal::new("first", Duration::ZERO);
        assert!(reveal.advance(Duration::ZERO).completed);

        reveal.restart("second");
        assert_eq!(reveal.visible(), "");
        assert!(!reveal.is_complete());
        assert!(reveal.advance(Duration::ZERO).completed);
        assert_eq!(reveal.visible(), "second");
    }

    #[test]
    fn test_grapheme_clusters_are_atomic() {
        // "é" as e + combining acute, followed by an emoji.
        let mut reveal = TextReveal::new("e\u{301}👍", DELAY);
        assert_eq!(reveal.len(), 2);

        reveal.advance(DELAY);
        assert_eq!(reveal.visible(), "e\u{301}");
        reveal.advance(DELAY);
        assert_eq!(reveal.visible(), "e\u{301}👍");
    }

    #[test]
    fn test_skip_completes_immediately() {
        let mut reveal = TextReveal::new("long message", DELAY);
        reveal.advance(DELAY);
        let step = reveal.skip();
        assert_eq!(step.revealed, 11);
        assert!(step.completed);
        assert_eq!(reveal.skip(), RevealStep::default());
    }
}
