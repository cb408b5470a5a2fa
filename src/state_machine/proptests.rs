//! Property-based tests for the turn state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::state::*;
use super::transition::*;
use super::*;
use crate::composer::CompletionError;
use crate::llm::LlmError;
use crate::persona::PersonaId;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> TurnContext {
    TurnContext::new("test-session", PersonaId::PhysicalTherapist)
}

/// Apply events in order, keeping the state unchanged on rejected transitions.
/// Returns the final state and every effect emitted along the way.
fn run_events(events: Vec<Event>) -> (TurnState, Vec<(TurnState, Effect)>) {
    let context = test_context();
    let mut state = TurnState::Idle;
    let mut emitted = Vec::new();

    for event in events {
        if let Ok(result) = transition(&state, &context, event) {
            for effect in result.effects {
                emitted.push((state.clone(), effect));
            }
            state = result.new_state;
        }
    }

    (state, emitted)
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_question() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}",
        "[a-zA-Z?]{1,20}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_question().prop_map(|question| Event::Submit { question }),
        Just(Event::Validate),
        any::<bool>().prop_map(|relevant| Event::RelevanceChecked { relevant }),
        "[a-z ]{0,20}".prop_map(|answer| Event::AnswerComposed { answer }),
        Just(Event::CompletionFailed {
            error: CompletionError(LlmError::unknown("boom")),
        }),
    ]
}

fn arb_terminal_state() -> impl Strategy<Value = TurnState> {
    prop_oneof![
        "[a-z]{1,10}".prop_map(|answer| TurnState::Success { answer }),
        Just(TurnState::Rejected {
            reason: RejectReason::EmptyInput
        }),
        Just(TurnState::Rejected {
            reason: RejectReason::OffTopic
        }),
        Just(TurnState::Failed {
            error: CompletionError(LlmError::network("down")),
        }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// History is only written from Composing, on the way to Success, at most once.
    #[test]
    fn prop_record_only_after_answer(events in proptest::collection::vec(arb_event(), 0..12)) {
        let (final_state, emitted) = run_events(events);

        let records: Vec<_> = emitted
            .iter()
            .filter(|(_, effect)| matches!(effect, Effect::RecordExchange { .. }))
            .collect();

        prop_assert!(records.len() <= 1);
        for (from, _) in &records {
            prop_assert!(
                matches!(from, TurnState::Composing { .. }),
                "recorded from {}",
                from.name()
            );
        }
        if !records.is_empty() {
            prop_assert!(
                matches!(final_state, TurnState::Success { .. }),
                "final state was {}",
                final_state.name()
            );
        }
    }

    /// Terminal states accept no further events.
    #[test]
    fn prop_terminal_states_are_final(state in arb_terminal_state(), event in arb_event()) {
        prop_assert!(transition(&state, &test_context(), event).is_err());
    }

    /// A blank question never reaches a completion call.
    #[test]
    fn prop_blank_question_never_calls_llm(
        blank in "[ \t\n]{0,4}",
        rest in proptest::collection::vec(arb_event(), 0..8),
    ) {
        let mut events = vec![Event::Submit { question: blank }, Event::Validate];
        events.extend(rest.into_iter().filter(|e| !matches!(e, Event::Submit { .. })));
        let (final_state, emitted) = run_events(events);

        prop_assert!(
            matches!(final_state, TurnState::Rejected { reason: RejectReason::EmptyInput }),
            "final state was {}",
            final_state.name()
        );
        prop_assert!(emitted.iter().all(|(_, e)| matches!(e, Effect::Validate)));
    }

    /// Submitting while a traversal is in flight is refused as busy.
    #[test]
    fn prop_submit_in_flight_is_busy(question in "[a-z]{1,10}") {
        for state in [
            TurnState::Validating { question: question.clone() },
            TurnState::CheckingRelevance { question: question.clone() },
            TurnState::Composing { question: question.clone() },
        ] {
            let result = transition(&state, &test_context(), Event::Submit { question: "x".to_string() });
            prop_assert_eq!(result.unwrap_err(), TransitionError::Busy);
        }
    }
}
