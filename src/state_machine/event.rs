//! Events that can occur during a turn

use crate::composer::CompletionError;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit { question: String },

    /// Input check requested by [`super::Effect::Validate`]
    Validate,

    // LLM events
    RelevanceChecked { relevant: bool },
    AnswerComposed { answer: String },
    CompletionFailed { error: CompletionError },
}
