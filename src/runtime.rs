//! Runtime for executing submissions
//!
//! Owns the session table and drives each submission through the turn state
//! machine. One submission runs at a time per session; sessions never share
//! conversation state.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::TurnController;

use crate::persona::PersonaId;
use crate::session::Session;
use crate::state_machine::{TransitionError, TurnOutcome};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Sessions untouched for this long are dropped by [`SessionManager::evict_idle`]
pub const DEFAULT_IDLE_TTL_SECS: i64 = 30 * 60;

/// Errors surfaced by the session table
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("A question is already being answered for this session")]
    Busy,
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Manager for all live sessions
pub struct SessionManager {
    controller: TurnController,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    idle_ttl: TimeDelta,
}

impl SessionManager {
    pub fn new(controller: TurnController) -> Self {
        Self {
            controller,
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: TimeDelta::seconds(DEFAULT_IDLE_TTL_SECS),
        }
    }

    pub fn with_idle_ttl(mut self, idle_ttl: TimeDelta) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    /// Start a new empty session and return its id
    pub async fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(Session::new(id.clone())));
        self.sessions.write().await.insert(id.clone(), session);
        tracing::info!(session_id = %id, "Session created");
        id
    }

    async fn handle(&self, id: &str) -> Result<Arc<Mutex<Session>>, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Copy of the session for rendering; waits for any in-flight submission.
    pub async fn snapshot(&self, id: &str) -> Result<Session, SessionError> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.touch();
        Ok(session.clone())
    }

    /// End a session. Its history goes with it.
    pub async fn remove(&self, id: &str) -> Result<(), SessionError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        tracing::info!(session_id = %id, "Session closed");
        Ok(())
    }

    /// Drop every session idle for longer than the TTL as of `now`. A session
    /// with a submission in flight is never dropped.
    pub async fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.idle_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.last_active() >= cutoff,
            Err(_) => true,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, live = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Run one submission to completion. Refuses rather than queues when the
    /// session is already processing one.
    pub async fn submit(
        &self,
        id: &str,
        persona: PersonaId,
        question: &str,
    ) -> Result<(TurnOutcome, Session), SessionError> {
        let handle = self.handle(id).await?;
        let mut session = handle.try_lock().map_err(|_| SessionError::Busy)?;
        session.touch();
        let outcome = self.controller.run(&mut session, persona, question).await?;
        Ok((outcome, session.clone()))
    }
}

/// Sweep idle sessions every `every` until the manager is dropped
pub fn spawn_reaper(manager: &Arc<SessionManager>, every: Duration) {
    let manager = Arc::downgrade(manager);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let Some(manager) = manager.upgrade() else {
                break;
            };
            manager.evict_idle(Utc::now()).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::MockLlmService;

    fn manager(llm: Arc<MockLlmService>) -> SessionManager {
        SessionManager::new(TurnController::new(llm, crate::llm::DEFAULT_TEMPERATURE))
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let manager = manager(Arc::new(MockLlmService::new()));
        let err = manager.snapshot("nope").await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let llm = Arc::new(MockLlmService::new());
        llm.queue_text("はい");
        llm.queue_text("Stretch gently.");
        let manager = manager(llm);

        let a = manager.create().await;
        let b = manager.create().await;

        let (outcome, session_a) = manager
            .submit(&a, PersonaId::PhysicalTherapist, "My back hurts")
            .await
            .unwrap();
        assert!(matches!(outcome, TurnOutcome::Answered { .. }));
        assert_eq!(session_a.history().len(), 2);

        let session_b = manager.snapshot(&b).await.unwrap();
        assert!(session_b.history().is_empty());
        assert!(session_b.pending_answer().is_none());
    }

    #[tokio::test]
    async fn test_busy_session_refuses_second_submission() {
        let manager = manager(Arc::new(MockLlmService::new()));
        let id = manager.create().await;

        let handle = manager.handle(&id).await.unwrap();
        let _guard = handle.lock().await;

        let err = manager
            .submit(&id, PersonaId::Nutritionist, "q")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Busy));
    }

    #[tokio::test]
    async fn test_idle_session_expires() {
        let manager = manager(Arc::new(MockLlmService::new()));
        let id = manager.create().await;

        let later = Utc::now() + TimeDelta::seconds(DEFAULT_IDLE_TTL_SECS + 60);
        assert_eq!(manager.evict_idle(later).await, 1);

        let err = manager.snapshot(&id).await.unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recent_session_survives_sweep() {
        let manager = manager(Arc::new(MockLlmService::new()));
        let id = manager.create().await;

        assert_eq!(manager.evict_idle(Utc::now()).await, 0);
        assert!(manager.snapshot(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_in_flight_session_is_kept() {
        let manager =
            manager(Arc::new(MockLlmService::new())).with_idle_ttl(TimeDelta::seconds(1));
        let id = manager.create().await;

        let handle = manager.handle(&id).await.unwrap();
        let _guard = handle.lock().await;

        let later = Utc::now() + TimeDelta::hours(1);
        assert_eq!(manager.evict_idle(later).await, 0);
    }

    #[tokio::test]
    async fn test_abandoned_page_loads_do_not_accumulate() {
        let manager = manager(Arc::new(MockLlmService::new()));
        for _ in 0..1_000 {
            manager.create().await;
        }

        let later = Utc::now() + TimeDelta::seconds(DEFAULT_IDLE_TTL_SECS + 1);
        manager.evict_idle(later).await;
        assert_eq!(manager.sessions.read().await.len(), 0);
    }

    #[tokio::test]
    async fn test_remove_ends_session() {
        let manager = manager(Arc::new(MockLlmService::new()));
        let id = manager.create().await;

        manager.remove(&id).await.unwrap();
        assert!(matches!(
            manager.snapshot(&id).await.unwrap_err(),
            SessionError::NotFound(_)
        ));
        assert!(matches!(
            manager.remove(&id).await.unwrap_err(),
            SessionError::NotFound(_)
        ));
    }
}
