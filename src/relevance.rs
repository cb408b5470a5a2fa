//! Topical relevance check
//!
//! A yes/no completion call decides whether a question is about health before
//! a full answer is generated. The gate is fail-open: only a reply containing
//! the explicit "no" token rejects the question.

use crate::llm::{LlmError, LlmRequest, LlmService};
use std::sync::Arc;

/// Reply token that marks a question as off-topic
pub const NEGATIVE_TOKEN: &str = "いいえ";

// Continuation lines carry a four-space indent.
const RELEVANCE_PROMPT: &str = concat!(
    "あなたは質問に対して、専門的な知識がある専門家です。\n",
    "    以下の質問が「健康」「身体」「栄養」「運動」「リハビリ」「メンタル」等に関する内容なら「はい」、\n",
    "    全く関係ない内容であれば、「いいえ」とだけ答えてください。\n",
    "\n",
    "    質問:",
);

/// Verdict of the relevance check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    Relevant,
    OffTopic,
}

/// Classify a raw classifier reply. Anything without [`NEGATIVE_TOKEN`] is relevant.
pub fn classify(reply: &str) -> Relevance {
    if reply.contains(NEGATIVE_TOKEN) {
        Relevance::OffTopic
    } else {
        Relevance::Relevant
    }
}

/// Build the classification request for a question
pub fn build_request(question: &str, temperature: f32) -> LlmRequest {
    LlmRequest::single_prompt(format!("{RELEVANCE_PROMPT}{question}\n    "), temperature)
}

pub struct RelevanceGate {
    llm: Arc<dyn LlmService>,
    temperature: f32,
}

impl RelevanceGate {
    pub fn new(llm: Arc<dyn LlmService>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    async fn check(&self, question: &str) -> Result<Relevance, LlmError> {
        let response = self
            .llm
            .complete(&build_request(question, self.temperature))
            .await?;
        let reply = response.text();
        let verdict = classify(&reply);
        tracing::debug!(reply = %reply.trim(), ?verdict, "Relevance check");
        Ok(verdict)
    }

    /// Ask the model whether `question` is in-domain
    pub async fn is_relevant(&self, question: &str) -> Result<bool, LlmError> {
        Ok(self.check(question).await? == Relevance::Relevant)
    }
}
