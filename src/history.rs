//! Session-scoped conversation history
//!
//! An append-only log of user/assistant turns. Turns are only ever added in
//! (question, answer) pairs, after the answer has been produced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used in the prompt transcript
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// What the presentation layer gets from [`HistoryLog::render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transcript<'a> {
    /// No exchange has happened yet
    Empty,
    Turns(&'a [Turn]),
}

impl<'a> Transcript<'a> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Transcript::Empty)
    }

    pub fn turns(&self) -> &'a [Turn] {
        match *self {
            Transcript::Empty => &[],
            Transcript::Turns(turns) => turns,
        }
    }
}

/// Ordered, append-only log of turns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    turns: Vec<Turn>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange. Both turns land or neither does.
    pub fn append(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        let pair = [Turn::user(user_text), Turn::assistant(assistant_text)];
        self.turns.extend(pair);
    }

    pub fn render(&self) -> Transcript<'_> {
        if self.is_empty() {
            Transcript::Empty
        } else {
            Transcript::Turns(&self.turns)
        }
    }

    /// Flatten the log into `"<Role>: <content>"` lines for the answer prompt
    pub fn format_for_prompt(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
