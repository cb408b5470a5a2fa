//! Effects produced by state transitions

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Check the submitted text
    Validate,

    /// Make the relevance completion request
    CheckRelevance { question: String },

    /// Make the answer completion request with the current history
    ComposeAnswer { question: String },

    /// Append the exchange to history and replace the latest answer
    RecordExchange { question: String, answer: String },
}

impl Effect {
    pub fn record_exchange(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Effect::RecordExchange {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
