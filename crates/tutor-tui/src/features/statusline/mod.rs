//! Status line feature slice.
//!
//! Shows the countdown, round number and phase, plus a one-line notice for
//! validation errors and fetch failures.

mod render;
mod state;

pub use render::{render_key_hints, render_status_line};
pub use state::{FetchState, Notice, NoticeKind, StatusState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_replaces_previous() {
        let mut status = StatusState::default();
        status.info("Loading questions…");
        status.error("Could not load questions");
        let notice = status.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Could not load questions");

        status.clear();
        assert!(status.notice().is_none());
    }

    #[test]
    fn test_fetch_state() {
        let mut status = StatusState::default();
        assert!(!status.is_loading());
        status.fetch = FetchState::Loading;
        assert!(status.is_loading());
    }
}
