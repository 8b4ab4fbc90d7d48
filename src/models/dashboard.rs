// src/models/dashboard.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::attempt::AttemptSummary;

/// Response for `GET /dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    /// Every attempt across all domains, most recent first.
    pub attempts: Vec<AttemptSummary>,

    /// Completion percentage per domain, 0 to 100.
    pub progress: BTreeMap<String, u32>,
}
