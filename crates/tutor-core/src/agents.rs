//! Agent personas and the directory that supplies them.
//!
//! Agents are scripted: the session controller only reads their identity and
//! appends thoughts. Nothing here talks to a model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the built-in instructor persona.
pub const INSTRUCTOR_ID: &str = "instructor";

/// Kind of an agent thought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThoughtKind {
    Observation,
    Analysis,
    Strategy,
    Question,
}

impl ThoughtKind {
    pub fn label(self) -> &'static str {
        match self {
            ThoughtKind::Observation => "observation",
            ThoughtKind::Analysis => "analysis",
            ThoughtKind::Strategy => "strategy",
            ThoughtKind::Question => "question",
        }
    }
}

impl fmt::Display for ThoughtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An internal note attributed to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thought {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub kind: ThoughtKind,
}

/// A named persona shown next to the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    /// Avatar image file name. Display only.
    pub avatar: String,
    pub role: String,
    #[serde(default)]
    pub thoughts: Vec<Thought>,
}

impl Agent {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        avatar: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: avatar.into(),
            role: role.into(),
            thoughts: Vec::new(),
        }
    }

    /// The persona that seeds each round and grades final answers.
    pub fn instructor() -> Self {
        Self::new(INSTRUCTOR_ID, "Bob", "bob.svg", "Instructor")
    }

    /// Appends a thought stamped with the current time.
    pub fn record_thought(&mut self, id: u64, content: impl Into<String>, kind: ThoughtKind) {
        self.thoughts.push(Thought {
            id,
            timestamp: Utc::now(),
            content: content.into(),
            kind,
        });
    }

    pub fn clear_thoughts(&mut self) {
        self.thoughts.clear();
    }
}

/// Read-only source of the agent roster, consulted once per session.
pub trait AgentDirectory {
    fn roster(&self) -> Vec<Agent>;
}

/// The two scripted study partners.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRoster;

impl AgentDirectory for BuiltinRoster {
    fn roster(&self) -> Vec<Agent> {
        vec![
            Agent::new(
                "agent1",
                "Logic Bot",
                "clyde.png",
                "Mathematical Reasoning Expert",
            ),
            Agent::new(
                "agent2",
                "Pattern Bot",
                "wade.png",
                "Pattern Recognition Specialist",
            ),
        ]
    }
}

/// A fixed roster, handy for tests and alternative front-ends.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster(pub Vec<Agent>);

impl AgentDirectory for StaticRoster {
    fn roster(&self) -> Vec<Agent> {
        self.0.clone()
    }
}
