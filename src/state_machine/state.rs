//! Turn state types

use crate::composer::CompletionError;
use crate::persona::PersonaId;
use serde::Serialize;

/// Shown when the question is blank
pub const EMPTY_INPUT_MESSAGE: &str = "質問を入力してください。";
/// Shown when the relevance check rejects the question
pub const OFF_TOPIC_MESSAGE: &str =
    "この質問は健康や栄養に関する内容ではないです。質問内容を変更してください。";
/// Shown for any completion failure; sub-causes are not surfaced
pub const COMPLETION_FAILED_MESSAGE: &str =
    "回答の取得に失敗しました。時間を置いて再度お試しください。";

/// Why a submission was turned away without an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    EmptyInput,
    OffTopic,
}

impl RejectReason {
    pub fn user_message(self) -> &'static str {
        match self {
            RejectReason::EmptyInput => EMPTY_INPUT_MESSAGE,
            RejectReason::OffTopic => OFF_TOPIC_MESSAGE,
        }
    }
}

/// Where a submission is in its traversal
#[derive(Debug, Clone, Default)]
pub enum TurnState {
    /// Ready for a submission
    #[default]
    Idle,

    /// Submission received, input not yet checked
    Validating { question: String },

    /// Relevance completion in flight
    CheckingRelevance { question: String },

    /// Answer completion in flight
    Composing { question: String },

    /// Answer produced and recorded
    Success { answer: String },

    Rejected { reason: RejectReason },

    Failed { error: CompletionError },
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TurnState::Success { .. } | TurnState::Rejected { .. } | TurnState::Failed { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            TurnState::Idle => "idle",
            TurnState::Validating { .. } => "validating",
            TurnState::CheckingRelevance { .. } => "checking_relevance",
            TurnState::Composing { .. } => "composing",
            TurnState::Success { .. } => "success",
            TurnState::Rejected { .. } => "rejected",
            TurnState::Failed { .. } => "failed",
        }
    }
}

/// Immutable inputs of one traversal
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub session_id: String,
    pub persona: PersonaId,
}

impl TurnContext {
    pub fn new(session_id: impl Into<String>, persona: PersonaId) -> Self {
        Self {
            session_id: session_id.into(),
            persona,
        }
    }
}

/// Result of a finished traversal, as seen by the presentation layer
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    Answered { answer: String },
    Rejected(RejectReason),
    Failed(CompletionError),
}

impl TurnOutcome {
    /// Convert a terminal state; `None` for any in-progress state
    pub fn from_terminal(state: TurnState) -> Option<Self> {
        match state {
            TurnState::Success { answer } => Some(TurnOutcome::Answered { answer }),
            TurnState::Rejected { reason } => Some(TurnOutcome::Rejected(reason)),
            TurnState::Failed { error } => Some(TurnOutcome::Failed(error)),
            TurnState::Idle
            | TurnState::Validating { .. }
            | TurnState::CheckingRelevance { .. }
            | TurnState::Composing { .. } => None,
        }
    }

    /// Inline message for the page, if any
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            TurnOutcome::Answered { .. } => None,
            TurnOutcome::Rejected(reason) => Some(reason.user_message()),
            TurnOutcome::Failed(_) => Some(COMPLETION_FAILED_MESSAGE),
        }
    }
}
