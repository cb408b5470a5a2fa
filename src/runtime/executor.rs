//! Turn executor: runs effects and feeds results back into the state machine

use crate::composer::{AnswerComposer, CompletionError};
use crate::llm::LlmService;
use crate::persona::PersonaId;
use crate::relevance::RelevanceGate;
use crate::session::Session;
use crate::state_machine::{
    transition, Effect, Event, TransitionError, TurnContext, TurnOutcome, TurnState,
};
use std::collections::VecDeque;
use std::sync::Arc;

/// Drives one submission from Idle to a terminal state
pub struct TurnController {
    gate: RelevanceGate,
    composer: AnswerComposer,
}

impl TurnController {
    pub fn new(llm: Arc<dyn LlmService>, temperature: f32) -> Self {
        Self {
            gate: RelevanceGate::new(llm.clone(), temperature),
            composer: AnswerComposer::new(llm, temperature),
        }
    }

    pub async fn run(
        &self,
        session: &mut Session,
        persona: PersonaId,
        question: &str,
    ) -> Result<TurnOutcome, TransitionError> {
        let context = TurnContext::new(session.id(), persona);
        let mut state = TurnState::Idle;
        let mut events = VecDeque::from([Event::Submit {
            question: question.to_string(),
        }]);

        while let Some(event) = events.pop_front() {
            let result = transition(&state, &context, event)?;
            tracing::debug!(
                session_id = %context.session_id,
                from = state.name(),
                to = result.new_state.name(),
                "Turn transition"
            );
            state = result.new_state;

            for effect in result.effects {
                if let Some(next) = self.execute_effect(effect, session, &context).await {
                    events.push_back(next);
                }
            }
        }

        let outcome = TurnOutcome::from_terminal(state).ok_or_else(|| {
            TransitionError::InvalidTransition("turn stopped before a terminal state".to_string())
        })?;

        match &outcome {
            TurnOutcome::Answered { .. } => tracing::info!(
                session_id = %context.session_id,
                persona = %persona,
                turns = session.history().len(),
                "Question answered"
            ),
            TurnOutcome::Rejected(reason) => tracing::info!(
                session_id = %context.session_id,
                persona = %persona,
                reason = ?reason,
                "Question rejected"
            ),
            TurnOutcome::Failed(error) => tracing::warn!(
                session_id = %context.session_id,
                persona = %persona,
                error = %error,
                kind = ?error.0.kind,
                "Answer could not be produced"
            ),
        }

        Ok(outcome)
    }

    async fn execute_effect(
        &self,
        effect: Effect,
        session: &mut Session,
        context: &TurnContext,
    ) -> Option<Event> {
        match effect {
            Effect::Validate => Some(Event::Validate),

            Effect::CheckRelevance { question } => match self.gate.is_relevant(&question).await {
                Ok(relevant) => Some(Event::RelevanceChecked { relevant }),
                Err(e) => Some(Event::CompletionFailed {
                    error: CompletionError(e),
                }),
            },

            Effect::ComposeAnswer { question } => {
                let history_text = session.history().format_for_prompt();
                match self
                    .composer
                    .compose(context.persona, &question, &history_text)
                    .await
                {
                    Ok(answer) => Some(Event::AnswerComposed { answer }),
                    Err(error) => Some(Event::CompletionFailed { error }),
                }
            }

            Effect::RecordExchange { question, answer } => {
                session.record_exchange(&question, &answer);
                None
            }
        }
    }
}
