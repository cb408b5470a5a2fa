//! Answer generation for a persona
//!
//! The prior transcript is inlined as plain text ahead of the new question in
//! one user message. It is never sent as separate assistant/user turns.

use crate::llm::{LlmError, LlmMessage, LlmRequest, LlmService, SystemContent};
use crate::persona::{instruction_for, PersonaId};
use std::sync::Arc;
use thiserror::Error;

/// The completion call behind an answer failed. Sub-causes are kept for logs only.
#[derive(Debug, Clone, Error)]
#[error("completion failed: {0}")]
pub struct CompletionError(#[from] pub LlmError);

/// Build the answer request: persona instruction as system, history + question as user
pub fn build_request(
    persona: PersonaId,
    question: &str,
    history_text: &str,
    temperature: f32,
) -> LlmRequest {
    LlmRequest {
        system: vec![SystemContent::new(instruction_for(persona))],
        messages: vec![LlmMessage::user(format!("{history_text}\n\n{question}"))],
        temperature: Some(temperature),
        max_tokens: None,
    }
}

pub struct AnswerComposer {
    llm: Arc<dyn LlmService>,
    temperature: f32,
}

impl AnswerComposer {
    pub fn new(llm: Arc<dyn LlmService>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    pub async fn compose(
        &self,
        persona: PersonaId,
        question: &str,
        history_text: &str,
    ) -> Result<String, CompletionError> {
        let request = build_request(persona, question, history_text, self.temperature);
        let response = self.llm.complete(&request).await?;
        Ok(response.text())
    }
}
