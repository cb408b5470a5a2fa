//! Per-submission turn state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions. The
//! runtime executes the returned effects and feeds their results back in as
//! events until a terminal state is reached.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{RejectReason, TurnContext, TurnOutcome, TurnState};
pub use transition::{transition, TransitionError};
