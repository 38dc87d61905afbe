//! Session controller: round lifecycle, countdown, transcript and phase gating.
//!
//! The controller is a plain state machine with no clock of its own. The
//! front-end feeds it:
//! - `tick()` once per second from its single countdown timer
//! - user intents (`ask_question`, `set_scratch`, `submit_final_answer`, `next_round`)
//! - `reveal_completed(id)` when a typewritten message finishes
//!
//! ## Phases
//!
//! ```text
//! Questioning ──timeout──▶ Questioning (next round)
//!      │
//!      └─submit─▶ FinalAnswerPending ─delay─▶ Evaluating ─last reveal─▶ Complete
//! ```
//!
//! The countdown is frozen from the moment an answer is accepted until a new
//! round starts; it never resumes inside the same round.
//!
//! ## Reveal chain
//!
//! After a submission the agents' answers and the instructor's evaluation are
//! queued as [`PendingReveal`]s. Only one chain message is revealing at a
//! time; the next one is appended when the presentation layer reports the
//! current one complete, so transcript order never depends on reveal speed.

use std::collections::VecDeque;
use std::error::Error;
use std::{fmt, iter};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agents::{Agent, ThoughtKind};
use crate::bag::ShuffleBag;
use crate::script;
use crate::transcript::{MessageId, Transcript};

/// Number of roster agents that answer after a submission.
const ANSWERING_AGENTS: usize = 2;

/// Timing knobs for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub round_duration_secs: u32,
    /// Countdown ticks between unprompted agent questions.
    pub agent_prompt_interval_secs: u32,
    /// Countdown ticks between an accepted answer and the first agent answer.
    pub reveal_start_delay_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_duration_secs: 120,
            agent_prompt_interval_secs: 30,
            reveal_start_delay_secs: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Round open: questions allowed, countdown running.
    Questioning,
    /// Answer accepted, waiting out the short delay before agents respond.
    FinalAnswerPending,
    /// Agent answers and the evaluation are being revealed.
    Evaluating,
    /// Evaluation finished; the round is over until `next_round`.
    Complete,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Questioning => "questioning",
            Phase::FinalAnswerPending => "answer submitted",
            Phase::Evaluating => "evaluating",
            Phase::Complete => "complete",
        }
    }
}

/// The active round.
#[derive(Debug, Clone)]
pub struct Round {
    /// 1-based round counter for the session.
    pub number: u64,
    pub problem_index: usize,
    pub problem: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: u32,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No problems are loaded (source failed or returned nothing).
    NoQuestions,
    /// `next_round` was requested before the current round finished.
    RoundInProgress,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoQuestions => write!(f, "no questions are available"),
            SessionError::RoundInProgress => write!(f, "the current round is still in progress"),
        }
    }
}

impl Error for SessionError {}

/// User-visible validation failure on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    EmptyScratchboard,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyScratchboard => {
                write!(f, "Show your work on the scratchboard before submitting")
            }
        }
    }
}

impl Error for SubmitError {}

/// Result of a well-formed submit intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted,
    /// Blank answer or questioning already closed; nothing changed.
    Ignored,
}

/// What a countdown tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No round has started yet.
    NoRound,
    /// Countdown decremented.
    Counted { remaining_secs: u32 },
    /// Countdown frozen; post-submission work may have advanced.
    Frozen,
    /// Time ran out. `restarted` is false if the next round could not start.
    Expired { restarted: bool },
}

/// A post-submission message waiting for its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingReveal {
    /// Answer from the roster agent at this index.
    AgentAnswer { agent_index: usize },
    /// Instructor evaluation (always last).
    Evaluation,
}

#[derive(Debug, Clone, Default)]
struct SubmissionRecord {
    answer: String,
    /// (agent name, approach) for each agent that has answered so far.
    agent_answers: Vec<(String, String)>,
}

pub struct SessionController<R = StdRng> {
    config: SessionConfig,
    rng: R,
    questions: Vec<String>,
    bag: ShuffleBag,
    round: Option<Round>,
    rounds_started: u64,
    remaining_secs: u32,
    timer_frozen: bool,
    /// Set once the current round's expiry has been handled.
    expiry_handled: bool,
    questioning_enabled: bool,
    ticks_since_prompt: u32,
    scratch: String,
    instructor: Agent,
    agents: Vec<Agent>,
    transcript: Transcript,
    next_thought_id: u64,
    /// Ticks left before the reveal chain starts.
    reveal_delay: Option<u32>,
    reveal_queue: VecDeque<PendingReveal>,
    /// Chain message currently revealing.
    awaiting: Option<MessageId>,
    submission: Option<SubmissionRecord>,
}

impl SessionController<StdRng> {
    /// Creates a controller seeded from OS entropy.
    pub fn with_entropy(config: SessionConfig, roster: Vec<Agent>) -> Self {
        Self::new(config, roster, StdRng::from_entropy())
    }
}

impl<R: Rng> SessionController<R> {
    pub fn new(config: SessionConfig, roster: Vec<Agent>, rng: R) -> Self {
        Self {
            config,
            rng,
            questions: Vec::new(),
            bag: ShuffleBag::default(),
            round: None,
            rounds_started: 0,
            remaining_secs: config.round_duration_secs,
            timer_frozen: true,
            expiry_handled: false,
            questioning_enabled: false,
            ticks_since_prompt: 0,
            scratch: String::new(),
            instructor: Agent::instructor(),
            agents: roster,
            transcript: Transcript::new(),
            next_thought_id: 0,
            reveal_delay: None,
            reveal_queue: VecDeque::new(),
            awaiting: None,
            submission: None,
        }
    }

    // ========================================================================
    // Question pool
    // ========================================================================

    /// Installs the problem pool fetched from the question source.
    ///
    /// An empty pool is rejected and the previous pool (if any) is kept.
    /// Reloading an identical pool keeps the draw history; a changed pool
    /// starts a new cycle that will not reopen with the problem on screen.
    pub fn load_questions(&mut self, questions: Vec<String>) -> Result<usize, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        if questions == self.questions {
            tracing::debug!(count = questions.len(), "question pool unchanged");
            return Ok(questions.len());
        }

        let current = self
            .round
            .as_ref()
            .and_then(|round| questions.iter().position(|q| *q == round.problem));
        self.bag = ShuffleBag::following(questions.len(), current);
        self.questions = questions;
        tracing::debug!(count = self.questions.len(), "question pool loaded");
        Ok(self.questions.len())
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    // ========================================================================
    // Round lifecycle
    // ========================================================================

    /// Starts a fresh round with an unused problem.
    ///
    /// Fails with `NoQuestions` before touching any state if no pool is loaded.
    pub fn start_round(&mut self) -> Result<(), SessionError> {
        let problem_index = self
            .bag
            .draw(&mut self.rng)
            .ok_or(SessionError::NoQuestions)?;
        let problem = self.questions[problem_index].clone();

        self.transcript.clear();
        self.instructor.clear_thoughts();
        for agent in &mut self.agents {
            agent.clear_thoughts();
        }

        self.transcript
            .push_agent(self.instructor.id.clone(), script::welcome(), false);
        self.transcript.push_agent(
            self.instructor.id.clone(),
            script::problem_statement(&problem),
            false,
        );

        self.rounds_started += 1;
        self.round = Some(Round {
            number: self.rounds_started,
            problem_index,
            problem,
            started_at: Utc::now(),
            duration_secs: self.config.round_duration_secs,
            phase: Phase::Questioning,
        });
        self.remaining_secs = self.config.round_duration_secs;
        self.timer_frozen = false;
        self.expiry_handled = false;
        self.questioning_enabled = true;
        self.ticks_since_prompt = 0;
        self.scratch.clear();
        self.reveal_delay = None;
        self.reveal_queue.clear();
        self.awaiting = None;
        self.submission = None;

        tracing::info!(
            round = self.rounds_started,
            problem_index,
            remaining_in_bag = self.bag.remaining(),
            "round started"
        );
        Ok(())
    }

    /// Starts the next round once the current one is complete, or after an
    /// expiry that could not start one.
    pub fn next_round(&mut self) -> Result<(), SessionError> {
        if self.is_stalled() {
            return self.start_round();
        }
        match self.phase() {
            None | Some(Phase::Complete) => self.start_round(),
            Some(_) => Err(SessionError::RoundInProgress),
        }
    }

    /// True when the round timed out but no replacement could be started.
    pub fn is_stalled(&self) -> bool {
        self.expiry_handled && self.phase() == Some(Phase::Questioning)
    }

    // ========================================================================
    // Countdown
    // ========================================================================

    /// Handles one tick of the one-second countdown.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(phase) = self.phase() else {
            return TickOutcome::NoRound;
        };

        match phase {
            Phase::Questioning if !self.timer_frozen => {}
            Phase::FinalAnswerPending => {
                self.advance_reveal_delay();
                return TickOutcome::Frozen;
            }
            _ => return TickOutcome::Frozen,
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return self.expire_round();
        }

        self.ticks_since_prompt += 1;
        if self.ticks_since_prompt >= self.config.agent_prompt_interval_secs {
            self.ticks_since_prompt = 0;
            self.periodic_agent_prompt();
        }

        TickOutcome::Counted {
            remaining_secs: self.remaining_secs,
        }
    }

    fn expire_round(&mut self) -> TickOutcome {
        if self.expiry_handled {
            return TickOutcome::Frozen;
        }
        self.expiry_handled = true;
        self.questioning_enabled = false;
        self.timer_frozen = true;

        let number = self.round.as_ref().map_or(0, |r| r.number);
        tracing::info!(round = number, "round timed out");

        match self.start_round() {
            Ok(()) => TickOutcome::Expired { restarted: true },
            Err(err) => {
                tracing::warn!(error = %err, "could not start the next round");
                TickOutcome::Expired { restarted: false }
            }
        }
    }

    fn advance_reveal_delay(&mut self) {
        match self.reveal_delay {
            Some(ticks) if ticks > 1 => self.reveal_delay = Some(ticks - 1),
            Some(_) => {
                self.reveal_delay = None;
                self.begin_reveals();
            }
            None => {}
        }
    }

    // ========================================================================
    // Question / answer exchange
    // ========================================================================

    /// Posts a student question and the instructor's scripted reply.
    ///
    /// Returns false (and changes nothing) for blank text or a closed round.
    pub fn ask_question(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || !self.questioning_enabled {
            return false;
        }
        self.transcript.push_user(text);
        let reply = script::question_reply(&mut self.rng);
        self.transcript
            .push_agent(self.instructor.id.clone(), reply, true);
        true
    }

    /// Has a random roster agent ask an unprompted question.
    ///
    /// Called every `agent_prompt_interval_secs` ticks while questioning is
    /// enabled. No-op with an empty roster or a closed round.
    pub fn periodic_agent_prompt(&mut self) -> Option<MessageId> {
        if !self.questioning_enabled || self.agents.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.agents.len());
        let prompt = script::agent_prompt(&mut self.rng);
        let thought_id = self.next_thought_id();

        let agent = &mut self.agents[index];
        agent.record_thought(thought_id, prompt.clone(), ThoughtKind::Question);
        let agent_id = agent.id.clone();
        Some(self.transcript.push_agent(agent_id, prompt, true))
    }

    /// Accepts the student's final answer.
    ///
    /// A blank answer or a closed round is ignored. A blank scratchboard is a
    /// validation failure that leaves every field untouched.
    pub fn submit_final_answer(&mut self, answer: &str) -> Result<Submission, SubmitError> {
        let answer = answer.trim();
        if answer.is_empty() || !self.questioning_enabled {
            return Ok(Submission::Ignored);
        }
        if self.scratch.trim().is_empty() {
            return Err(SubmitError::EmptyScratchboard);
        }

        self.timer_frozen = true;
        self.questioning_enabled = false;
        if let Some(round) = self.round.as_mut() {
            round.phase = Phase::FinalAnswerPending;
        }

        self.transcript
            .push_user(script::final_answer(answer, self.scratch.trim_end()));

        self.reveal_queue = (0..self.agents.len().min(ANSWERING_AGENTS))
            .map(|agent_index| PendingReveal::AgentAnswer { agent_index })
            .chain(iter::once(PendingReveal::Evaluation))
            .collect();
        self.submission = Some(SubmissionRecord {
            answer: answer.to_string(),
            agent_answers: Vec::new(),
        });

        tracing::info!(
            remaining_secs = self.remaining_secs,
            "final answer submitted"
        );

        if self.config.reveal_start_delay_secs == 0 {
            self.begin_reveals();
        } else {
            self.reveal_delay = Some(self.config.reveal_start_delay_secs);
        }
        Ok(Submission::Accepted)
    }

    // ========================================================================
    // Reveal chain
    // ========================================================================

    /// Reports that the presentation layer finished revealing `id`.
    ///
    /// Returns true if this completion advanced the post-submission chain.
    pub fn reveal_completed(&mut self, id: MessageId) -> bool {
        self.transcript.finish_reveal(id);
        if self.awaiting != Some(id) {
            return false;
        }
        self.awaiting = None;
        self.reveal_next();
        true
    }

    /// Reveals still queued after the one currently in flight.
    pub fn pending_reveals(&self) -> impl Iterator<Item = &PendingReveal> {
        self.reveal_queue.iter()
    }

    fn begin_reveals(&mut self) {
        if let Some(round) = self.round.as_mut() {
            round.phase = Phase::Evaluating;
        }
        self.reveal_next();
    }

    fn reveal_next(&mut self) {
        let Some(next) = self.reveal_queue.pop_front() else {
            if let Some(round) = self.round.as_mut() {
                round.phase = Phase::Complete;
                tracing::info!(round = round.number, "evaluation complete");
            }
            return;
        };

        let (agent_id, text) = match next {
            PendingReveal::AgentAnswer { agent_index } => {
                let approach = script::agent_approach(&mut self.rng);
                let thought_id = self.next_thought_id();
                let agent = &mut self.agents[agent_index];
                agent.record_thought(thought_id, approach.clone(), ThoughtKind::Strategy);
                let text = script::agent_answer(agent, &approach);
                if let Some(record) = self.submission.as_mut() {
                    record.agent_answers.push((agent.name.clone(), approach));
                }
                (agent.id.clone(), text)
            }
            PendingReveal::Evaluation => {
                let record = self.submission.clone().unwrap_or_default();
                let text = script::evaluation(&record.answer, &record.agent_answers);
                (self.instructor.id.clone(), text)
            }
        };

        self.awaiting = Some(self.transcript.push_agent(agent_id, text, true));
    }

    fn next_thought_id(&mut self) -> u64 {
        let id = self.next_thought_id;
        self.next_thought_id += 1;
        id
    }

    // ========================================================================
    // Scratchboard
    // ========================================================================

    pub fn scratch(&self) -> &str {
        &self.scratch
    }

    pub fn set_scratch(&mut self, text: impl Into<String>) {
        self.scratch = text.into();
    }

    // ========================================================================
    // Read-only view
    // ========================================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.round.as_ref().map(|r| r.phase)
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_questioning_enabled(&self) -> bool {
        self.questioning_enabled
    }

    pub fn is_timer_running(&self) -> bool {
        self.round.is_some() && !self.timer_frozen
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn instructor(&self) -> &Agent {
        &self.instructor
    }

    /// Roster agents (excludes the instructor).
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Looks up any agent by id, including the instructor.
    pub fn agent(&self, id: &str) -> Option<&Agent> {
        if self.instructor.id == id {
            return Some(&self.instructor);
        }
        self.agents.iter().find(|a| a.id == id)
    }
}
