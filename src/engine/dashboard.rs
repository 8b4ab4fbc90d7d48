// src/engine/dashboard.rs

use std::collections::BTreeMap;

use crate::{
    engine::{EngineError, progression::ProgressStore},
    models::{
        attempt::AttemptSummary,
        catalog::Catalog,
        dashboard::DashboardView,
        user::UserId,
    },
};

/// Share of a domain completed, `round(100 * (unlocked - 1) / total)` clamped to 0..=100.
/// `None` for a domain without steps.
pub fn completion_percent(unlocked_index: u32, total_steps: u32) -> Option<u32> {
    if total_steps == 0 {
        return None;
    }
    let done = unlocked_index.saturating_sub(1) as f64;
    let percent = (100.0 * done / total_steps as f64).round();
    Some(percent.clamp(0.0, 100.0) as u32)
}

/// Summarizes every attempt (newest first) and per-domain completion for the caller.
pub async fn build_dashboard(
    store: &dyn ProgressStore,
    catalog: &Catalog,
    user: &UserId,
) -> Result<DashboardView, EngineError> {
    let mut attempts: Vec<AttemptSummary> = store
        .list_attempts(user, None)
        .await?
        .into_iter()
        .map(AttemptSummary::from)
        .collect();
    attempts.reverse();

    let mut progress = BTreeMap::new();
    for domain in catalog.domains() {
        let total_steps = domain.steps.len() as u32;
        if total_steps == 0 {
            continue;
        }
        let unlocked_index = store.get_progress(user, &domain.name).await?;
        if let Some(percent) = completion_percent(unlocked_index, total_steps) {
            progress.insert(domain.name.clone(), percent);
        }
    }

    Ok(DashboardView { attempts, progress })
}
