// src/models/roadmap.rs

use serde::Serialize;

use crate::models::catalog::{QuestionDefinition, QuizDefinition};

/// Response for `GET /roadmap/{domain}`.
#[derive(Debug, Serialize)]
pub struct RoadmapView {
    pub steps: Vec<StepView>,

    /// The caller's unlocked step index for this domain.
    pub progress: u32,
}

#[derive(Debug, Serialize)]
pub struct StepView {
    pub index: u32,
    pub title: String,
    pub description: String,
    pub videos: Vec<String>,
    pub quiz: PublicQuiz,

    /// Display hint only. Submissions are re-checked against stored progress.
    pub locked: bool,
}

/// Quiz as sent to clients. Deliberately has no field for the answer key.
#[derive(Debug, Serialize)]
pub struct PublicQuiz {
    pub questions: Vec<PublicQuestion>,
}

/// DTO for sending a question to the client (prompt and choices only).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub q: String,
    pub a: Vec<String>,
}

impl From<&QuestionDefinition> for PublicQuestion {
    fn from(question: &QuestionDefinition) -> Self {
        Self {
            q: question.q.clone(),
            a: question.a.clone(),
        }
    }
}

impl From<&QuizDefinition> for PublicQuiz {
    fn from(quiz: &QuizDefinition) -> Self {
        Self {
            questions: quiz.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}
