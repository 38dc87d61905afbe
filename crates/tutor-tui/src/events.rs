//! UI events consumed by the reducer.

use std::time::Duration;

use crossterm::event::Event;

/// Everything that can change UI state.
///
/// Terminal input and frame housekeeping come from the runtime loop; the
/// rest arrive through the inbox from spawned tasks.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Frame tick. `elapsed` is the time since the previous tick and paces
    /// the typewriter reveals.
    Tick { elapsed: Duration },

    /// Start of a frame with the current terminal size.
    Frame { width: u16, height: u16 },

    /// Raw terminal input.
    Terminal(Event),

    /// One second of the round countdown elapsed.
    CountdownTick,

    /// Result of a question fetch. Errors are pre-rendered for display.
    QuestionsLoaded { result: Result<Vec<String>, String> },
}
