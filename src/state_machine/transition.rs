//! Pure state transition function

use super::{Effect, Event, RejectReason, TurnContext, TurnState};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: TurnState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: TurnState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A submission is already in progress")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(
    state: &TurnState,
    context: &TurnContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submission
        // ============================================================
        (TurnState::Idle, Event::Submit { question }) => {
            Ok(TransitionResult::new(TurnState::Validating { question })
                .with_effect(Effect::Validate))
        }

        (state, Event::Submit { .. }) if !state.is_terminal() => Err(TransitionError::Busy),

        // ============================================================
        // Validation
        // ============================================================
        (TurnState::Validating { question }, Event::Validate) => {
            if question.trim().is_empty() {
                Ok(TransitionResult::new(TurnState::Rejected {
                    reason: RejectReason::EmptyInput,
                }))
            } else {
                Ok(TransitionResult::new(TurnState::CheckingRelevance {
                    question: question.clone(),
                })
                .with_effect(Effect::CheckRelevance {
                    question: question.clone(),
                }))
            }
        }

        // ============================================================
        // Relevance
        // ============================================================
        (TurnState::CheckingRelevance { .. }, Event::RelevanceChecked { relevant: false }) => {
            Ok(TransitionResult::new(TurnState::Rejected {
                reason: RejectReason::OffTopic,
            }))
        }

        (TurnState::CheckingRelevance { question }, Event::RelevanceChecked { relevant: true }) => {
            Ok(TransitionResult::new(TurnState::Composing {
                question: question.clone(),
            })
            .with_effect(Effect::ComposeAnswer {
                question: question.clone(),
            }))
        }

        // ============================================================
        // Composition
        // ============================================================
        (TurnState::Composing { question }, Event::AnswerComposed { answer }) => {
            let record = Effect::record_exchange(question.clone(), answer.clone());
            Ok(TransitionResult::new(TurnState::Success { answer }).with_effect(record))
        }

        // A failed gate call fails the turn the same way a failed answer does
        (
            TurnState::CheckingRelevance { .. } | TurnState::Composing { .. },
            Event::CompletionFailed { error },
        ) => Ok(TransitionResult::new(TurnState::Failed { error })),

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} in state {} (session {})",
            state.name(),
            context.session_id
        ))),
    }
}
