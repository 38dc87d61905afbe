//! Reveal pacing.
//!
//! Completed reveals are reported back to the session, which may append the
//! next message of a post-submission chain. The view is re-synced afterwards
//! so a successor starts typing on the following frame.

use std::time::Duration;

use tutor_core::session::SessionController;
use tutor_core::transcript::MessageId;

use super::state::TranscriptView;

/// Advances typewriter reveals by one frame.
pub fn advance_reveals(view: &mut TranscriptView, session: &mut SessionController, elapsed: Duration) {
    view.sync(session.transcript());
    let completed = view.advance(elapsed);
    report_completed(view, session, completed);
}

/// Finishes every visible reveal at once (Esc).
pub fn skip_reveals(view: &mut TranscriptView, session: &mut SessionController) {
    view.sync(session.transcript());
    let completed = view.skip_all();
    report_completed(view, session, completed);
}

fn report_completed(
    view: &mut TranscriptView,
    session: &mut SessionController,
    completed: Vec<MessageId>,
) {
    if completed.is_empty() {
        return;
    }
    for id in completed {
        session.reveal_completed(id);
    }
    view.sync(session.transcript());
}
