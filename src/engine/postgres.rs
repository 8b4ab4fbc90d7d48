// src/engine/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use crate::{
    engine::{
        EngineError,
        progression::{NewAttempt, ProgressStore, advance_frontier, ensure_unlocked},
    },
    models::{
        attempt::{Attempt, AttemptRow},
        user::UserId,
    },
};

/// PostgreSQL-backed progression store.
///
/// The unlocked index lives in `progress`, attempts in `attempts`. Every
/// submission runs in one transaction holding a row lock on the
/// (user, domain) progress row, so concurrent submissions for the same key
/// queue up behind each other.
#[derive(Debug, Clone)]
pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(1).max(1)
}

#[async_trait]
impl ProgressStore for PgProgressStore {
    async fn get_progress(&self, user: &UserId, domain: &str) -> Result<u32, EngineError> {
        let unlocked: Option<i32> = sqlx::query_scalar(
            "SELECT unlocked_index FROM progress WHERE user_id = $1 AND domain = $2",
        )
        .bind(user.as_str())
        .bind(domain)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unlocked.map(from_db).unwrap_or(1))
    }

    async fn record_attempt(&self, attempt: NewAttempt) -> Result<Attempt, EngineError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO progress (user_id, domain)
            VALUES ($1, $2)
            ON CONFLICT (user_id, domain) DO NOTHING
            "#,
        )
        .bind(attempt.user_id.as_str())
        .bind(&attempt.domain)
        .execute(&mut *tx)
        .await?;

        let unlocked: i32 = sqlx::query_scalar(
            "SELECT unlocked_index FROM progress WHERE user_id = $1 AND domain = $2 FOR UPDATE",
        )
        .bind(attempt.user_id.as_str())
        .bind(&attempt.domain)
        .fetch_one(&mut *tx)
        .await?;
        let unlocked = from_db(unlocked);

        if let Err(e) = ensure_unlocked(&attempt, unlocked) {
            tx.rollback().await?;
            return Err(e);
        }

        let row: AttemptRow = sqlx::query_as(
            r#"
            INSERT INTO attempts (user_id, domain, step_index, answers, results, score, total, passed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, domain, step_index, answers, results, score, total, passed, submitted_at
            "#,
        )
        .bind(attempt.user_id.as_str())
        .bind(&attempt.domain)
        .bind(to_db(attempt.step_index))
        .bind(Json(&attempt.answers))
        .bind(Json(&attempt.outcome.results))
        .bind(to_db(attempt.outcome.score))
        .bind(to_db(attempt.outcome.total))
        .bind(attempt.outcome.passed)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert attempt: {:?}", e);
            e
        })?;

        let next = advance_frontier(
            unlocked,
            attempt.step_index,
            attempt.outcome.passed,
            attempt.total_steps,
        );
        if next != unlocked {
            sqlx::query(
                r#"
                UPDATE progress
                SET unlocked_index = $3, updated_at = CURRENT_TIMESTAMP
                WHERE user_id = $1 AND domain = $2
                "#,
            )
            .bind(attempt.user_id.as_str())
            .bind(&attempt.domain)
            .bind(to_db(next))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }

    async fn list_attempts(
        &self,
        user: &UserId,
        domain: Option<&str>,
    ) -> Result<Vec<Attempt>, EngineError> {
        let rows: Vec<AttemptRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, domain, step_index, answers, results, score, total, passed, submitted_at
            FROM attempts
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR domain = $2)
            ORDER BY submitted_at ASC, id ASC
            "#,
        )
        .bind(user.as_str())
        .bind(domain)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Attempt::from).collect())
    }
}
