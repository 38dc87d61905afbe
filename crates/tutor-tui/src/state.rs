//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── session: SessionController  (rounds, timer, transcript, agents)
//! │   ├── transcript: TranscriptView  (typewriter progress, scroll)
//! │   ├── input: InputState           (question, scratchboard, answer)
//! │   └── status: StatusState         (notice, fetch progress)
//! └── overlay: Option<Overlay>        (entry gate)
//! ```
//!
//! Overlays live beside `TuiState` so an overlay handler can hold `&mut`
//! to both without borrow conflicts.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tutor_core::agents::{AgentDirectory, BuiltinRoster};
use tutor_core::config::Config;
use tutor_core::session::SessionController;

use crate::input::InputState;
use crate::overlays::{GateState, Overlay};
use crate::statusline::StatusState;
use crate::transcript::TranscriptView;

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    /// Builds the state for a live session with the built-in roster.
    ///
    /// The entry gate is shown unless disabled in config or skipped.
    pub fn new(config: Config, skip_gate: bool) -> Self {
        let session =
            SessionController::with_entropy(config.session_config(), BuiltinRoster.roster());
        let gate = (config.gate.enabled && !skip_gate)
            .then(|| GateState::new(config.gate.captcha_length, StdRng::from_entropy()));
        Self::with_session(config, session, gate)
    }

    pub fn with_session(
        config: Config,
        session: SessionController,
        gate: Option<GateState>,
    ) -> Self {
        Self {
            tui: TuiState::new(config, session),
            overlay: gate.map(Overlay::Gate),
        }
    }
}

pub struct TuiState {
    pub should_quit: bool,
    pub config: Config,
    pub session: SessionController,
    pub transcript: TranscriptView,
    pub input: InputState,
    pub status: StatusState,
    /// Set once the countdown task has been requested.
    pub countdown_started: bool,
    /// Last known terminal size (width, height).
    pub terminal_size: (u16, u16),
}

impl TuiState {
    pub fn new(config: Config, session: SessionController) -> Self {
        let transcript = TranscriptView::new(config.reveal_char_delay());
        Self {
            should_quit: false,
            config,
            session,
            transcript,
            input: InputState::new(),
            status: StatusState::default(),
            countdown_started: false,
            terminal_size: (0, 0),
        }
    }

    /// Lines to move per PageUp/PageDown.
    pub fn page_size(&self) -> usize {
        (self.terminal_size.1 / 2).max(1) as usize
    }
}
