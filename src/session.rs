//! Per-user session state

use crate::history::HistoryLog;
use chrono::{DateTime, Utc};

/// Everything one user's conversation owns. Nothing here is shared across sessions.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    history: HistoryLog,
    pending_answer: Option<String>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            created_at: now,
            last_active: now,
            history: HistoryLog::new(),
            pending_answer: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last time the session was viewed or asked a question
    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Most recent successful answer
    pub fn pending_answer(&self) -> Option<&str> {
        self.pending_answer.as_deref()
    }

    /// Commit a successful exchange: history first, then the latest answer.
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.history.append(question, answer);
        self.pending_answer = Some(answer.to_string());
    }
}
