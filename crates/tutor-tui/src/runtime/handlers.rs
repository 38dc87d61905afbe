//! Effect handlers: async functions the runtime spawns.
//!
//! Each returns or sends `UiEvent`s; none touch UI state directly.

use std::sync::Arc;
use std::time::Duration;

use tokio::task;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tutor_core::questions::QuestionSource;

use super::inbox::UiEventSender;
use crate::events::UiEvent;

/// Countdown resolution.
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Fetches the problem pool on the blocking pool.
pub async fn fetch_questions(source: Arc<dyn QuestionSource>, category: String) -> UiEvent {
    let description = source.describe();
    let joined = task::spawn_blocking(move || source.fetch(&category)).await;

    let result = match joined {
        Ok(Ok(questions)) => {
            tracing::debug!(source = %description, count = questions.len(), "fetched questions");
            Ok(questions)
        }
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(err) => Err(format!("question fetch task failed: {err}")),
    };
    UiEvent::QuestionsLoaded { result }
}

/// Sends `CountdownTick` once per second until cancelled or the inbox closes.
///
/// This is the only timer driving rounds; it runs for the whole session.
pub async fn countdown(tx: UiEventSender, cancel: CancellationToken) {
    let mut interval = interval_at(Instant::now() + COUNTDOWN_PERIOD, COUNTDOWN_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if tx.send(UiEvent::CountdownTick).is_err() {
                    break;
                }
            }
        }
    }
    tracing::debug!("countdown stopped");
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;
    use tokio::sync::mpsc;
    use tutor_core::questions::{BuiltinQuestions, FileQuestions};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_countdown_ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(countdown(tx, cancel.clone()));

        let started = Instant::now();
        for _ in 0..3 {
            assert!(matches!(rx.recv().await, Some(UiEvent::CountdownTick)));
        }
        assert_eq!(started.elapsed(), Duration::from_secs(3));

        cancel.cancel();
        task.await.unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_stops_when_inbox_closes() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        // Completes on its own after the first failed send.
        countdown(tx, CancellationToken::new()).await;
    }

    #[tokio::test]
    async fn test_fetch_builtin_questions() {
        let event = fetch_questions(Arc::new(BuiltinQuestions), "combinatorics".to_string()).await;
        match event {
            UiEvent::QuestionsLoaded { result: Ok(questions) } => assert!(!questions.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_reports_source_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(&path, "not json").unwrap();

        let event = fetch_questions(Arc::new(FileQuestions::new(&path)), "combinatorics".to_string()).await;
        match event {
            UiEvent::QuestionsLoaded { result: Err(message) } => {
                assert!(message.contains("Failed to parse questions"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
