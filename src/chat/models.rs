//! The core models for managing a chat session with an LLM.
use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::groq::{Message, Role};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingReply,
}

/// The outcome of asking the model for the next reply. `content` is
/// always recorded as the assistant's turn, even when it's a fallback.
/// `notice` is set when the request failed and the user should be
/// told about it.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub content: String,
    pub notice: Option<String>,
}

impl Completion {
    pub fn reply(content: &str) -> Self {
        Self {
            content: content.to_string(),
            notice: None,
        }
    }

    pub fn fallback(content: &str, notice: String) -> Self {
        Self {
            content: content.to_string(),
            notice: Some(notice),
        }
    }
}

/// One conversation. Messages are only ever appended or cleared all
/// at once.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub id: String,
    messages: Vec<Message>,
    state: TurnState,
    notice: Option<String>,
}

impl Session {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn record_message(&mut self, role: Role, content: &str) {
        self.messages.push(Message::new(role, content));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.notice = None;
        self.state = TurnState::Idle;
    }

    /// Takes the notice left by the last failed turn so it's only shown
    /// once.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Records the user's message and returns the full history that
    /// should be sent to the model.
    pub fn begin_turn(&mut self, content: &str) -> Result<Vec<Message>> {
        if self.state == TurnState::AwaitingReply {
            bail!("Session {} is already waiting for a reply", self.id);
        }
        self.record_message(Role::User, content);
        self.state = TurnState::AwaitingReply;
        Ok(self.messages.clone())
    }

    /// Records the assistant's reply. Returns `false` if the session
    /// was cleared while the reply was in flight, in which case the
    /// reply is dropped.
    pub fn finish_turn(&mut self, completion: Completion) -> bool {
        if self.state != TurnState::AwaitingReply {
            tracing::warn!(
                "Dropping reply for session {} that is no longer waiting",
                self.id
            );
            return false;
        }
        self.record_message(Role::Assistant, &completion.content);
        self.notice = completion.notice;
        self.state = TurnState::Idle;
        true
    }
}

/// All active sessions keyed by session ID.
#[derive(Debug, Default)]
pub struct Sessions(HashMap<String, Session>);

impl Sessions {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.0.get_mut(id)
    }

    /// Initializes the session if it doesn't exist yet. Existing
    /// sessions are returned untouched.
    pub fn get_or_create(&mut self, id: &str) -> &mut Session {
        self.0
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
