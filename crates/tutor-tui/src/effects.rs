//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only, which keeps the reducer pure:
//! it mutates state and returns effects, never spawning anything itself.

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Fetch the problem pool for `category` off the UI thread.
    FetchQuestions { category: String },

    /// Start the one-second countdown task. Ignored if already running.
    StartCountdown,
}
