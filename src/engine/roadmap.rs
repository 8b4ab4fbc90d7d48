// src/engine/roadmap.rs

use crate::{
    engine::{EngineError, progression::ProgressStore},
    models::{
        catalog::Catalog,
        roadmap::{PublicQuiz, RoadmapView, StepView},
        user::UserId,
    },
};

/// Merges the domain's steps with the caller's progress.
///
/// Quizzes are converted to `PublicQuiz`, which has no place for the answer key.
pub async fn build_roadmap_view(
    store: &dyn ProgressStore,
    catalog: &Catalog,
    user: &UserId,
    domain: &str,
) -> Result<RoadmapView, EngineError> {
    let definition = catalog.domain(domain)?;
    let unlocked_index = store.get_progress(user, domain).await?;

    let steps = definition
        .steps
        .iter()
        .map(|step| StepView {
            index: step.index,
            title: step.title.clone(),
            description: step.description.clone(),
            videos: step.videos.clone(),
            quiz: PublicQuiz::from(&step.quiz),
            locked: step.index > unlocked_index,
        })
        .collect();

    Ok(RoadmapView {
        steps,
        progress: unlocked_index,
    })
}
