//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tutor_core::session::{SessionError, Submission, TickOutcome};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::input::{self, InputAction};
use crate::overlays::{self, OverlayUpdate};
use crate::state::{AppState, TuiState};
use crate::statusline::FetchState;
use crate::transcript;

/// Effects to run once before the event loop starts.
///
/// Questions are fetched right away unless the entry gate is open; the gate
/// requests them when it closes.
pub fn init(app: &mut AppState) -> Vec<UiEffect> {
    if app.overlay.is_some() {
        return vec![];
    }
    request_questions(&mut app.tui)
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick { elapsed } => {
            transcript::advance_reveals(&mut app.tui.transcript, &mut app.tui.session, elapsed);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.tui.terminal_size = (width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::CountdownTick => {
            handle_countdown_tick(&mut app.tui);
            vec![]
        }
        UiEvent::QuestionsLoaded { result } => handle_questions_loaded(&mut app.tui, result),
    }
}

// ============================================================================
// Session events
// ============================================================================

fn handle_countdown_tick(tui: &mut TuiState) {
    match tui.session.tick() {
        TickOutcome::Expired { restarted: true } => {
            tui.input.reset_for_round();
            tui.transcript.scroll.follow_latest();
            tui.status.info("Time's up! Here's a new problem.");
        }
        TickOutcome::Expired { restarted: false } => {
            tui.status
                .error("Time's up, but no new problem is available. Press Ctrl+R to reload.");
        }
        TickOutcome::NoRound | TickOutcome::Counted { .. } | TickOutcome::Frozen => {}
    }
}

fn handle_questions_loaded(tui: &mut TuiState, result: Result<Vec<String>, String>) -> Vec<UiEffect> {
    tui.status.fetch = FetchState::Idle;

    let questions = match result {
        Ok(questions) => questions,
        Err(message) => {
            tracing::error!(error = %message, "question fetch failed");
            tui.status.error(format!(
                "Could not load questions: {message}. Press Ctrl+R to retry."
            ));
            return vec![];
        }
    };

    match tui.session.load_questions(questions) {
        Ok(count) => {
            tracing::info!(count, category = %tui.config.category, "questions loaded");
            tui.status.clear();
        }
        Err(err) => {
            tracing::warn!(category = %tui.config.category, "question source returned no problems");
            tui.status.error(format!(
                "Category '{}': {err}. Press Ctrl+R to retry.",
                tui.config.category
            ));
            return vec![];
        }
    }

    // A reload only replaces a round that timed out without a successor.
    if tui.session.round().is_some() && !tui.session.is_stalled() {
        return vec![];
    }
    start_round(tui)
}

fn start_round(tui: &mut TuiState) -> Vec<UiEffect> {
    if let Err(err) = tui.session.start_round() {
        tui.status.error(err.to_string());
        return vec![];
    }
    tui.input.reset_for_round();
    tui.transcript.scroll.follow_latest();

    if tui.countdown_started {
        return vec![];
    }
    tui.countdown_started = true;
    vec![UiEffect::StartCountdown]
}

fn request_questions(tui: &mut TuiState) -> Vec<UiEffect> {
    if tui.status.is_loading() {
        return vec![];
    }
    tui.status.fetch = FetchState::Loading;
    tui.status.info("Loading questions…");
    vec![UiEffect::FetchQuestions {
        category: tui.config.category.clone(),
    }]
}

fn next_round(tui: &mut TuiState) {
    match tui.session.next_round() {
        Ok(()) => {
            tui.input.reset_for_round();
            tui.transcript.scroll.follow_latest();
            tui.status.clear();
        }
        Err(SessionError::RoundInProgress) => {
            tui.status
                .info("Finish this round first: submit an answer and wait for the evaluation.");
        }
        Err(err @ SessionError::NoQuestions) => {
            tui.status.error(format!("{err}. Press Ctrl+R to reload."));
        }
    }
}

fn apply_input_action(tui: &mut TuiState, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::ScratchEdited(text) => tui.session.set_scratch(text),
        InputAction::Ask(text) => {
            if tui.session.ask_question(&text) {
                tui.input.question.clear();
                tui.transcript.scroll.follow_latest();
                tui.status.clear();
            } else if !text.trim().is_empty() && !tui.session.is_questioning_enabled() {
                tui.status.info("Questions are closed for this round.");
            }
        }
        InputAction::Submit(answer) => {
            tui.session.set_scratch(tui.input.scratch.text());
            match tui.session.submit_final_answer(&answer) {
                Ok(Submission::Accepted) => {
                    tui.input.answer.clear();
                    tui.transcript.scroll.follow_latest();
                    tui.status.info("Answer submitted. The other agents are answering…");
                }
                Ok(Submission::Ignored) => {
                    if !answer.trim().is_empty() && !tui.session.is_questioning_enabled() {
                        tui.status.info("This round is closed. Press Ctrl+N for the next problem.");
                    }
                }
                Err(err) => tui.status.error(err.to_string()),
            }
        }
    }
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Paste(text) => {
            if app.overlay.is_none() {
                let action = input::handle_paste(&mut app.tui.input, &text);
                apply_input_action(&mut app.tui, action);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if matches!(key.kind, KeyEventKind::Release) {
        return vec![];
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    if let Some(overlay) = app.overlay.as_mut() {
        return match overlays::handle_overlay_key(overlay, key) {
            OverlayUpdate::Stay => vec![],
            OverlayUpdate::Quit => vec![UiEffect::Quit],
            OverlayUpdate::Close => {
                app.overlay = None;
                tracing::info!("entry gate passed");
                request_questions(&mut app.tui)
            }
        };
    }

    let tui = &mut app.tui;
    match key.code {
        KeyCode::Char('n') if ctrl => {
            next_round(tui);
            vec![]
        }
        KeyCode::Char('r') if ctrl => request_questions(tui),
        KeyCode::Esc => {
            transcript::skip_reveals(&mut tui.transcript, &mut tui.session);
            vec![]
        }
        KeyCode::PageUp => {
            let page = tui.page_size();
            tui.transcript.scroll.scroll_up(page);
            vec![]
        }
        KeyCode::PageDown => {
            let page = tui.page_size();
            tui.transcript.scroll.scroll_down(page);
            vec![]
        }
        _ => {
            let action = input::handle_key(&mut tui.input, key);
            apply_input_action(tui, action);
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tutor_core::agents::{AgentDirectory, BuiltinRoster};
    use tutor_core::config::Config;
    use tutor_core::session::{Phase, SessionController};

    use super::*;
    use crate::input::Focus;
    use crate::overlays::{GateState, GateStep, Overlay};
    use crate::statusline::NoticeKind;

    fn app_with(config: Config, gate: bool) -> AppState {
        let session = SessionController::new(
            config.session_config(),
            BuiltinRoster.roster(),
            StdRng::seed_from_u64(21),
        );
        let gate = gate.then(|| GateState::new(4, StdRng::seed_from_u64(22)));
        AppState::with_session(config, session, gate)
    }

    fn app() -> AppState {
        app_with(Config::default(), false)
    }

    fn loaded_app() -> AppState {
        let mut app = app();
        init(&mut app);
        update(&mut app, loaded(&["How many ways?", "Count the subsets."]));
        app
    }

    fn loaded(questions: &[&str]) -> UiEvent {
        UiEvent::QuestionsLoaded {
            result: Ok(questions.iter().map(ToString::to_string).collect()),
        }
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(ch: char) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char(ch),
            KeyModifiers::CONTROL,
        )))
    }

    fn type_str(app: &mut AppState, text: &str) {
        for ch in text.chars() {
            update(app, key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_init_fetches_questions_without_gate() {
        let mut app = app();
        let effects = init(&mut app);
        assert_eq!(
            effects,
            vec![UiEffect::FetchQuestions {
                category: "combinatorics".to_string()
            }]
        );
        assert!(app.tui.status.is_loading());
        // A second request while loading is coalesced.
        assert!(update(&mut app, ctrl('r')).is_empty());
    }

    #[test]
    fn test_first_load_starts_round_and_countdown() {
        let mut app = app();
        init(&mut app);
        let effects = update(&mut app, loaded(&["How many ways?"]));

        assert_eq!(effects, vec![UiEffect::StartCountdown]);
        assert_eq!(app.tui.session.phase(), Some(Phase::Questioning));
        assert!(app.tui.countdown_started);
        assert!(!app.tui.status.is_loading());

        // Reloading replaces the pool without a second countdown.
        let effects = update(&mut app, ctrl('r'));
        assert_eq!(effects.len(), 1);
        assert!(update(&mut app, loaded(&["Another?"])).is_empty());
        assert_eq!(app.tui.session.round().unwrap().number, 1);
    }

    #[test]
    fn test_fetch_failure_shows_retry_notice() {
        let mut app = app();
        init(&mut app);
        let effects = update(
            &mut app,
            UiEvent::QuestionsLoaded {
                result: Err("Failed to read questions".to_string()),
            },
        );

        assert!(effects.is_empty());
        assert!(app.tui.session.round().is_none());
        let notice = app.tui.status.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("Ctrl+R"));

        assert_eq!(update(&mut app, ctrl('r')).len(), 1);
    }

    #[test]
    fn test_failed_reload_keeps_current_round() {
        let mut app = loaded_app();
        type_str(&mut app, "Does order matter?");
        update(&mut app, key(KeyCode::Enter));
        update(&mut app, UiEvent::CountdownTick);

        let messages = app.tui.session.transcript().len();
        let number = app.tui.session.round().unwrap().number;
        let remaining = app.tui.session.remaining_secs();

        assert_eq!(update(&mut app, ctrl('r')).len(), 1);
        let effects = update(
            &mut app,
            UiEvent::QuestionsLoaded {
                result: Err("Failed to read questions".to_string()),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(app.tui.session.transcript().len(), messages);
        assert_eq!(app.tui.session.round().unwrap().number, number);
        assert_eq!(app.tui.session.remaining_secs(), remaining);
        assert_eq!(app.tui.session.phase(), Some(Phase::Questioning));
        assert_eq!(app.tui.status.notice().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_successful_reload_keeps_open_round() {
        let mut app = loaded_app();
        let number = app.tui.session.round().unwrap().number;
        let problem = app.tui.session.round().unwrap().problem.clone();

        update(&mut app, ctrl('r'));
        let effects = update(&mut app, loaded(&["How many ways?", "Count the subsets."]));

        assert!(effects.is_empty());
        assert_eq!(app.tui.session.round().unwrap().number, number);
        assert_eq!(app.tui.session.round().unwrap().problem, problem);
        assert!(!app.tui.status.is_loading());
    }

    #[test]
    fn test_empty_pool_does_not_start_round() {
        let mut app = app();
        init(&mut app);
        assert!(update(&mut app, loaded(&[])).is_empty());
        assert!(app.tui.session.round().is_none());
        assert_eq!(app.tui.status.notice().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_gate_blocks_session_until_passed() {
        let mut app = app_with(Config::default(), true);
        assert!(init(&mut app).is_empty());

        // Keys go to the gate, not the question box.
        update(&mut app, key(KeyCode::Char('x')));
        assert!(app.tui.input.question.text().is_empty());

        let code = match &app.overlay {
            Some(Overlay::Gate(gate)) => match gate.step() {
                GateStep::Captcha { code, .. } => code.clone(),
                GateStep::Consent { .. } => unreachable!(),
            },
            None => unreachable!(),
        };
        update(&mut app, key(KeyCode::Backspace));
        type_str(&mut app, &code);
        update(&mut app, key(KeyCode::Enter));
        update(&mut app, key(KeyCode::Char(' ')));
        let effects = update(&mut app, key(KeyCode::Enter));

        assert!(app.overlay.is_none());
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::FetchQuestions { .. }]
        ));
    }

    #[test]
    fn test_ctrl_c_quits_even_with_gate_open() {
        let mut app = app_with(Config::default(), true);
        assert_eq!(update(&mut app, ctrl('c')), vec![UiEffect::Quit]);
    }

    #[test]
    fn test_ask_clears_question_box() {
        let mut app = loaded_app();
        let before = app.tui.session.transcript().len();
        type_str(&mut app, "Does order matter?");
        update(&mut app, key(KeyCode::Enter));

        assert_eq!(app.tui.session.transcript().len(), before + 2);
        assert!(app.tui.input.question.text().is_empty());
    }

    #[test]
    fn test_submit_without_scratch_shows_error() {
        let mut app = loaded_app();
        app.tui.input.focus = Focus::Answer;
        type_str(&mut app, "42");
        update(&mut app, key(KeyCode::Enter));

        assert_eq!(app.tui.session.phase(), Some(Phase::Questioning));
        assert_eq!(app.tui.input.answer.text(), "42");
        let notice = app.tui.status.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.contains("scratchboard"));
    }

    #[test]
    fn test_full_round_through_keys() {
        let mut app = loaded_app();

        update(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "5 * 4 / 2");
        assert_eq!(app.tui.session.scratch(), "5 * 4 / 2");

        update(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "10");
        update(&mut app, key(KeyCode::Enter));
        assert_eq!(app.tui.session.phase(), Some(Phase::FinalAnswerPending));
        assert!(!app.tui.session.is_timer_running());

        // Ctrl+N is refused until the evaluation is done.
        update(&mut app, ctrl('n'));
        assert_eq!(app.tui.session.round().unwrap().number, 1);

        update(&mut app, UiEvent::CountdownTick);
        assert_eq!(app.tui.session.phase(), Some(Phase::Evaluating));
        for _ in 0..3 {
            update(&mut app, key(KeyCode::Esc));
        }
        assert_eq!(app.tui.session.phase(), Some(Phase::Complete));

        update(&mut app, ctrl('n'));
        assert_eq!(app.tui.session.round().unwrap().number, 2);
        assert!(app.tui.input.scratch.is_blank());
        assert_eq!(app.tui.input.focus, Focus::Question);
    }

    #[test]
    fn test_frame_ticks_reveal_chain_without_keys() {
        let config = Config {
            reveal_start_delay_secs: 0,
            ..Config::default()
        };
        let mut app = app_with(config, false);
        init(&mut app);
        update(&mut app, loaded(&["How many ways?"]));
        app.tui.session.set_scratch("work");
        app.tui.session.submit_final_answer("3").unwrap();

        for _ in 0..20 {
            update(
                &mut app,
                UiEvent::Tick {
                    elapsed: Duration::from_secs(10),
                },
            );
        }
        assert_eq!(app.tui.session.phase(), Some(Phase::Complete));
    }

    #[test]
    fn test_timeout_resets_inputs() {
        let config = Config {
            round_duration_secs: 2,
            ..Config::default()
        };
        let mut app = app_with(config, false);
        init(&mut app);
        update(&mut app, loaded(&["A", "B"]));
        type_str(&mut app, "half-typed");

        update(&mut app, UiEvent::CountdownTick);
        update(&mut app, UiEvent::CountdownTick);

        assert_eq!(app.tui.session.round().unwrap().number, 2);
        assert!(app.tui.input.question.text().is_empty());
        assert_eq!(app.tui.session.remaining_secs(), 2);
    }
}
