//! Chat transcript for one session.
//!
//! Message ids come from a sequence owned by the transcript and are never
//! reset, so ids stay strictly increasing across rounds even though the
//! visible messages are cleared at each round start.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    /// Authoring agent for `Sender::Agent` messages.
    pub agent_id: Option<String>,
    /// Whether the presentation layer should typewriter this message.
    pub reveal: bool,
}

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
    revealing: BTreeSet<MessageId>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        self.push(Sender::User, text.into(), None, false)
    }

    /// Appends an agent message; `reveal` marks it as currently revealing.
    pub fn push_agent(
        &mut self,
        agent_id: impl Into<String>,
        text: impl Into<String>,
        reveal: bool,
    ) -> MessageId {
        self.push(Sender::Agent, text.into(), Some(agent_id.into()), reveal)
    }

    fn push(
        &mut self,
        sender: Sender,
        text: String,
        agent_id: Option<String>,
        reveal: bool,
    ) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        if reveal {
            self.revealing.insert(id);
        }
        self.messages.push(Message {
            id,
            sender,
            text,
            agent_id,
            reveal,
        });
        id
    }

    /// Removes every message. The id sequence keeps counting.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.revealing.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        // Ids are appended in order, so the slice is sorted by id.
        self.messages
            .binary_search_by_key(&id, |m| m.id)
            .ok()
            .map(|idx| &self.messages[idx])
    }

    pub fn is_revealing(&self, id: MessageId) -> bool {
        self.revealing.contains(&id)
    }

    /// Ids still being revealed, oldest first.
    pub fn revealing(&self) -> impl Iterator<Item = MessageId> + '_ {
        self.revealing.iter().copied()
    }

    /// Marks a reveal as finished. Returns false if `id` was not revealing.
    pub fn finish_reveal(&mut self, id: MessageId) -> bool {
        self.revealing.remove(&id)
    }
}
