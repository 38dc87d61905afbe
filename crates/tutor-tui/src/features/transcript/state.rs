//! Transcript view state: per-message typewriter reveals and scrolling.

use std::collections::BTreeMap;
use std::time::Duration;

use tutor_core::reveal::{RevealStep, TextReveal};
use tutor_core::transcript::{Message, MessageId, Transcript};

/// Scroll position measured in lines from the bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset_from_bottom: usize,
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        self.offset_from_bottom == 0
    }

    pub fn offset_from_bottom(&self) -> usize {
        self.offset_from_bottom
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_sub(lines);
    }

    pub fn follow_latest(&mut self) {
        self.offset_from_bottom = 0;
    }
}

#[derive(Debug)]
pub struct TranscriptView {
    reveals: BTreeMap<MessageId, TextReveal>,
    char_delay: Duration,
    pub scroll: ScrollState,
}

impl TranscriptView {
    pub fn new(char_delay: Duration) -> Self {
        Self {
            reveals: BTreeMap::new(),
            char_delay,
            scroll: ScrollState::default(),
        }
    }

    /// Mirrors the transcript's revealing set: starts a typewriter for each
    /// new revealing message and drops finished or cleared ones.
    pub fn sync(&mut self, transcript: &Transcript) {
        self.reveals.retain(|id, _| transcript.is_revealing(*id));
        let delay = self.char_delay;
        for id in transcript.revealing() {
            if let Some(message) = transcript.get(id) {
                self.reveals
                    .entry(id)
                    .or_insert_with(|| TextReveal::new(message.text.clone(), delay));
            }
        }
    }

    /// Advances every active reveal, returning ids that just completed.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<MessageId> {
        self.step_all(|reveal| reveal.advance(elapsed))
    }

    /// Finishes every active reveal immediately.
    pub fn skip_all(&mut self) -> Vec<MessageId> {
        self.step_all(TextReveal::skip)
    }

    fn step_all(&mut self, mut step: impl FnMut(&mut TextReveal) -> RevealStep) -> Vec<MessageId> {
        self.reveals
            .iter_mut()
            .filter_map(|(id, reveal)| step(reveal).completed.then_some(*id))
            .collect()
    }

    pub fn is_animating(&self) -> bool {
        self.reveals.values().any(|reveal| !reveal.is_complete())
    }

    /// Text to draw for `message`: the revealed prefix while typing.
    pub fn visible_text<'a>(&'a self, message: &'a Message) -> &'a str {
        match self.reveals.get(&message.id) {
            Some(reveal) => reveal.visible(),
            None => &message.text,
        }
    }

    /// True while `message` is still being typed out.
    pub fn is_typing(&self, message: &Message) -> bool {
        self.reveals
            .get(&message.id)
            .is_some_and(|reveal| !reveal.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(30);

    #[test]
    fn test_sync_tracks_revealing_messages() {
        let mut transcript = Transcript::new();
        let seed = transcript.push_agent("instructor", "Welcome", false);
        let typed = transcript.push_agent("agent1", "Hi", true);

        let mut view = TranscriptView::new(DELAY);
        view.sync(&transcript);

        let seed_msg = transcript.get(seed).unwrap();
        let typed_msg = transcript.get(typed).unwrap();
        assert_eq!(view.visible_text(seed_msg), "Welcome");
        assert_eq!(view.visible_text(typed_msg), "");
        assert!(view.is_typing(typed_msg));
        assert!(view.is_animating());
    }

    #[test]
    fn test_advance_reports_completion_once() {
        let mut transcript = Transcript::new();
        let id = transcript.push_agent("agent1", "Hi", true);
        let mut view = TranscriptView::new(DELAY);
        view.sync(&transcript);

        assert!(view.advance(DELAY).is_empty());
        assert_eq!(view.advance(DELAY), vec![id]);
        assert!(view.advance(DELAY).is_empty());

        transcript.finish_reveal(id);
        view.sync(&transcript);
        assert!(!view.is_animating());
        assert_eq!(view.visible_text(transcript.get(id).unwrap()), "Hi");
    }

    #[test]
    fn test_skip_all_completes_everything() {
        let mut transcript = Transcript::new();
        let a = transcript.push_agent("agent1", "first", true);
        let b = transcript.push_agent("agent2", "second", true);
        let mut view = TranscriptView::new(DELAY);
        view.sync(&transcript);

        assert_eq!(view.skip_all(), vec![a, b]);
        assert!(!view.is_animating());
    }

    #[test]
    fn test_sync_drops_cleared_messages() {
        let mut transcript = Transcript::new();
        transcript.push_agent("agent1", "old round", true);
        let mut view = TranscriptView::new(DELAY);
        view.sync(&transcript);

        transcript.clear();
        view.sync(&transcript);
        assert!(!view.is_animating());
    }

    #[test]
    fn test_scroll_state() {
        let mut scroll = ScrollState::default();
        assert!(scroll.is_following());
        scroll.scroll_up(5);
        scroll.scroll_down(2);
        assert_eq!(scroll.offset_from_bottom(), 3);
        scroll.follow_latest();
        assert!(scroll.is_following());
    }
}
