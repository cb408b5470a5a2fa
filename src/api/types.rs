//! API request and response types

use crate::history::{Transcript, Turn};
use crate::persona::PersonaId;
use crate::session::Session;
use crate::state_machine::{RejectReason, TurnOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to ask the selected expert a question
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub persona: PersonaId,
    #[serde(default)]
    pub question: String,
}

/// One selectable expert
#[derive(Debug, Serialize)]
pub struct PersonaInfo {
    pub id: PersonaId,
    pub label: &'static str,
}

/// Response for persona list
#[derive(Debug, Serialize)]
pub struct PersonasResponse {
    pub personas: Vec<PersonaInfo>,
}

/// Response for session creation
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// Transcript as rendered on the page; `empty` is the explicit no-history signal
#[derive(Debug, Serialize)]
pub struct TranscriptView {
    pub empty: bool,
    pub turns: Vec<Turn>,
}

impl From<Transcript<'_>> for TranscriptView {
    fn from(transcript: Transcript<'_>) -> Self {
        Self {
            empty: transcript.is_empty(),
            turns: transcript.turns().to_vec(),
        }
    }
}

/// Response with the session's transcript and latest answer
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub transcript: TranscriptView,
    pub latest_answer: Option<String>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            created_at: session.created_at(),
            transcript: session.history().render().into(),
            latest_answer: session.pending_answer().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Answered,
    Rejected,
    Failed,
}

/// Response for an ask action
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(flatten)]
    pub session: SessionResponse,
}

impl AskResponse {
    pub fn new(outcome: &TurnOutcome, session: &Session) -> Self {
        let (kind, reason, answer) = match outcome {
            TurnOutcome::Answered { answer } => (OutcomeKind::Answered, None, Some(answer.clone())),
            TurnOutcome::Rejected(reason) => (OutcomeKind::Rejected, Some(*reason), None),
            TurnOutcome::Failed(_) => (OutcomeKind::Failed, None, None),
        };
        Self {
            outcome: kind,
            reason,
            message: outcome.user_message(),
            answer,
            session: session.into(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
