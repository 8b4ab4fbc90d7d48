// src/handlers/dashboard.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    engine::{ProgressStore, dashboard::build_dashboard},
    error::AppError,
    models::{catalog::Catalog, user::UserId},
};

/// Attempt history (newest first) and completion per domain for the caller.
pub async fn get_dashboard(
    State(store): State<Arc<dyn ProgressStore>>,
    State(catalog): State<Arc<Catalog>>,
    Extension(user): Extension<UserId>,
) -> Result<impl IntoResponse, AppError> {
    let dashboard = build_dashboard(store.as_ref(), &catalog, &user).await?;
    Ok(Json(dashboard))
}
