// src/engine/mod.rs

//! Roadmap progression and assessment scoring.
//!
//! Everything in here takes the caller's identity explicitly and is free of
//! HTTP concerns; handlers translate `EngineError` into responses.

pub mod assessment;
pub mod dashboard;
pub mod memory;
pub mod postgres;
pub mod progression;
pub mod roadmap;
pub mod scoring;

use thiserror::Error;

pub use memory::MemoryProgressStore;
pub use postgres::PgProgressStore;
pub use progression::{NewAttempt, ProgressStore};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Domain '{0}' not found")]
    DomainNotFound(String),

    #[error("Step {step_index} not found in domain '{domain}'")]
    StepNotFound { domain: String, step_index: i64 },

    #[error(
        "Step {step_index} of '{domain}' is locked; steps up to {unlocked_index} are available"
    )]
    StepLocked {
        domain: String,
        step_index: u32,
        unlocked_index: u32,
    },

    #[error("Answers must be a list of choice indices, got {0}")]
    InvalidAnswerShape(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    use crate::engine::scoring::PassThreshold;
    use crate::models::catalog::{Catalog, DomainDefinition};

    /// "Backend": 3 steps, each a 2-question quiz whose answers are both choice 0.
    /// "Frontend": 4 steps, single question each. "Soon": no steps yet.
    pub fn catalog() -> Catalog {
        let two_questions = json!({ "questions": [
            { "q": "First?", "a": ["right", "wrong"], "correct": 0 },
            { "q": "Second?", "a": ["right", "wrong", "also wrong"], "correct": 0 }
        ]});
        let one_question = json!({ "questions": [
            { "q": "Only?", "a": ["right", "wrong"], "correct": 0 }
        ]});

        let steps = |count: u32, quiz: &serde_json::Value| {
            (1..=count)
                .map(|i| {
                    json!({
                        "index": i,
                        "title": format!("Step {}", i),
                        "description": format!("Material for step {}", i),
                        "videos": [format!("https://www.youtube.com/watch?v=step{}", i)],
                        "quiz": quiz
                    })
                })
                .collect::<Vec<_>>()
        };

        let domains: Vec<DomainDefinition> = serde_json::from_value(json!([
            { "name": "Backend", "steps": steps(3, &two_questions) },
            { "name": "Frontend", "steps": steps(4, &one_question) },
            { "name": "Soon", "steps": [] }
        ]))
        .unwrap();

        Catalog::from_domains(domains).unwrap()
    }

    pub fn half() -> PassThreshold {
        PassThreshold::new(0.5).unwrap()
    }
}
