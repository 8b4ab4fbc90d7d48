// src/engine/memory.rs

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::{
    engine::{
        EngineError,
        progression::{NewAttempt, ProgressStore, advance_frontier, ensure_unlocked},
    },
    models::{attempt::Attempt, user::UserId},
};

type ProgressKey = (UserId, String);

#[derive(Debug)]
struct ProgressLog {
    unlocked_index: u32,
    attempts: Vec<Attempt>,
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self {
            unlocked_index: 1,
            attempts: Vec::new(),
        }
    }
}

/// Process-local store for development and tests. Nothing survives a restart.
///
/// Each (user, domain) gets its own mutex, so submissions for different keys
/// never contend while two submissions for the same key run one after another.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    logs: RwLock<HashMap<ProgressKey, Arc<Mutex<ProgressLog>>>>,
    next_id: AtomicI64,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn existing_log(&self, user: &UserId, domain: &str) -> Option<Arc<Mutex<ProgressLog>>> {
        self.logs
            .read()
            .await
            .get(&(user.clone(), domain.to_string()))
            .cloned()
    }

    async fn log_for(&self, user: &UserId, domain: &str) -> Arc<Mutex<ProgressLog>> {
        if let Some(log) = self.existing_log(user, domain).await {
            return log;
        }
        self.logs
            .write()
            .await
            .entry((user.clone(), domain.to_string()))
            .or_default()
            .clone()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn get_progress(&self, user: &UserId, domain: &str) -> Result<u32, EngineError> {
        match self.existing_log(user, domain).await {
            Some(log) => Ok(log.lock().await.unlocked_index),
            None => Ok(1),
        }
    }

    async fn record_attempt(&self, attempt: NewAttempt) -> Result<Attempt, EngineError> {
        let log = match self.existing_log(&attempt.user_id, &attempt.domain).await {
            Some(log) => log,
            None => {
                // A first submission is checked before the key exists.
                ensure_unlocked(&attempt, ProgressLog::default().unlocked_index)?;
                self.log_for(&attempt.user_id, &attempt.domain).await
            }
        };
        let mut log = log.lock().await;

        ensure_unlocked(&attempt, log.unlocked_index)?;

        let recorded = Attempt {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: attempt.user_id.to_string(),
            domain: attempt.domain,
            step_index: attempt.step_index,
            answers: attempt.answers,
            results: attempt.outcome.results,
            score: attempt.outcome.score,
            total: attempt.outcome.total,
            passed: attempt.outcome.passed,
            submitted_at: Utc::now(),
        };

        log.unlocked_index = advance_frontier(
            log.unlocked_index,
            recorded.step_index,
            recorded.passed,
            attempt.total_steps,
        );
        log.attempts.push(recorded.clone());

        Ok(recorded)
    }

    async fn list_attempts(
        &self,
        user: &UserId,
        domain: Option<&str>,
    ) -> Result<Vec<Attempt>, EngineError> {
        let logs = self.logs.read().await;
        let mut attempts = Vec::new();
        for ((owner, log_domain), log) in logs.iter() {
            if owner != user || domain.is_some_and(|d| d != log_domain.as_str()) {
                continue;
            }
            attempts.extend(log.lock().await.attempts.iter().cloned());
        }
        attempts.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at).then(a.id.cmp(&b.id)));
        Ok(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{fixtures, scoring::score};

    fn submission(
        user: &UserId,
        domain: &str,
        step_index: u32,
        answers: Vec<Option<usize>>,
    ) -> NewAttempt {
        let catalog = fixtures::catalog();
        let quiz = &catalog.step(domain, step_index as i64).unwrap().quiz;
        NewAttempt {
            user_id: user.clone(),
            domain: domain.to_string(),
            step_index,
            total_steps: catalog.total_steps(domain).unwrap(),
            outcome: score(quiz, &answers, fixtures::half()),
            answers,
        }
    }

    fn pass(user: &UserId, domain: &str, step_index: u32) -> NewAttempt {
        submission(user, domain, step_index, vec![Some(0), Some(0)])
    }

    fn fail(user: &UserId, domain: &str, step_index: u32) -> NewAttempt {
        submission(user, domain, step_index, vec![Some(1), Some(1)])
    }

    #[tokio::test]
    async fn test_new_user_starts_at_step_one() {
        let store = MemoryProgressStore::new();
        let user = UserId::new("alice");
        assert_eq!(store.get_progress(&user, "Backend").await.unwrap(), 1);
        assert!(store.list_attempts(&user, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_scenario() {
        let store = MemoryProgressStore::new();
        let user = UserId::new("alice");

        // One right, one wrong: 1/2 meets the 50% threshold.
        let first = store
            .record_attempt(submission(&user, "Backend", 1, vec![Some(0), Some(1)]))
            .await
            .unwrap();
        assert_eq!((first.score, first.total, first.passed), (1, 2, true));
        assert_eq!(store.get_progress(&user, "Backend").await.unwrap(), 2);

        let locked = store.record_attempt(pass(&user, "Backend", 3)).await;
        assert!(matches!(
            locked,
            Err(EngineError::StepLocked { step_index: 3, unlocked_index: 2, .. })
        ));
        assert_eq!(store.get_progress(&user, "Backend").await.unwrap(), 2);
        assert_eq!(store.list_attempts(&user, Some("Backend")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_first_submission_creates_no_entry() {
        let store = MemoryProgressStore::new();
        let user = UserId::new("mallory");

        let locked = store.record_attempt(pass(&user, "Backend", 3)).await;
        assert!(matches!(
            locked,
            Err(EngineError::StepLocked { step_index: 3, unlocked_index: 1, .. })
        ));
        assert!(store.logs.read().await.is_empty());
        assert!(store.list_attempts(&user, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_attempt_is_recorded_without_unlock() {
        let store = MemoryProgressStore::new();
        let user = UserId::new("bob");

        let attempt = store.record_attempt(fail(&user, "Backend", 1)).await.unwrap();
        assert!(!attempt.passed);
        assert_eq!(store.get_progress(&user, "Backend").await.unwrap(), 1);
        assert_eq!(store.list_attempts(&user, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replaying_earlier_step_keeps_progress() {
        let store = MemoryProgressStore::new();
        let user = UserId::new("carol");

        store.record_attempt(pass(&user, "Backend", 1)).await.unwrap();
        store.record_attempt(pass(&user, "Backend", 2)).await.unwrap();
        assert_eq!(store.get_progress(&user, "Backend").await.unwrap(), 3);

        store.record_attempt(pass(&user, "Backend", 1)).await.unwrap();
        store.record_attempt(fail(&user, "Backend", 2)).await.unwrap();
        assert_eq!(store.get_progress(&user, "Backend").await.unwrap(), 3);
        assert_eq!(store.list_attempts(&user, Some("Backend")).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_passing_last_step_caps_progress() {
        let store = MemoryProgressStore::new();
        let user = UserId::new("dave");

        for step in 1..=3 {
            store.record_attempt(pass(&user, "Backend", step)).await.unwrap();
        }
        assert_eq!(store.get_progress(&user, "Backend").await.unwrap(), 3);

        store.record_attempt(pass(&user, "Backend", 3)).await.unwrap();
        assert_eq!(store.get_progress(&user, "Backend").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_progress_never_decreases() {
        let store = MemoryProgressStore::new();
        let user = UserId::new("erin");
        let sequence = [
            (1, true),
            (1, false),
            (2, false),
            (3, true),
            (2, true),
            (1, true),
            (3, true),
            (3, false),
        ];

        let mut previous = store.get_progress(&user, "Backend").await.unwrap();
        for (step, passes) in sequence {
            let attempt = if passes {
                pass(&user, "Backend", step)
            } else {
                fail(&user, "Backend", step)
            };
            let _ = store.record_attempt(attempt).await;
            let current = store.get_progress(&user, "Backend").await.unwrap();
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, 3);
    }

    #[tokio::test]
    async fn test_concurrent_passes_unlock_once() {
        let store = Arc::new(MemoryProgressStore::new());
        let user = UserId::new("frank");

        let (a, b) = tokio::join!(
            {
                let store = store.clone();
                let attempt = pass(&user, "Backend", 1);
                tokio::spawn(async move { store.record_attempt(attempt).await })
            },
            {
                let store = store.clone();
                let attempt = pass(&user, "Backend", 1);
                tokio::spawn(async move { store.record_attempt(attempt).await })
            }
        );
        assert!(a.unwrap().is_ok());
        assert!(b.unwrap().is_ok());

        assert_eq!(store.get_progress(&user, "Backend").await.unwrap(), 2);
        assert_eq!(store.list_attempts(&user, Some("Backend")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_domains_and_users_are_independent() {
        let store = MemoryProgressStore::new();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        store.record_attempt(pass(&alice, "Backend", 1)).await.unwrap();
        assert_eq!(store.get_progress(&alice, "Frontend").await.unwrap(), 1);
        assert_eq!(store.get_progress(&bob, "Backend").await.unwrap(), 1);
        assert!(store.list_attempts(&bob, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_attempts_is_ascending_and_filterable() {
        let store = MemoryProgressStore::new();
        let user = UserId::new("grace");

        store.record_attempt(pass(&user, "Backend", 1)).await.unwrap();
        store
            .record_attempt(submission(&user, "Frontend", 1, vec![Some(0)]))
            .await
            .unwrap();
        store.record_attempt(fail(&user, "Backend", 2)).await.unwrap();

        let all = store.list_attempts(&user, None).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|a| a.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(all.len(), 3);

        let backend = store.list_attempts(&user, Some("Backend")).await.unwrap();
        assert_eq!(backend.len(), 2);
        assert!(backend.iter().all(|a| a.domain == "Backend"));
    }
}
