// src/handlers/roadmap.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    engine::{ProgressStore, roadmap::build_roadmap_view},
    error::AppError,
    models::{catalog::Catalog, user::UserId},
};

/// Returns the domain's steps with lock flags for the caller.
/// The domain arrives percent-encoded (e.g. `AI%2FML`) and is decoded by `Path`.
pub async fn get_roadmap(
    State(store): State<Arc<dyn ProgressStore>>,
    State(catalog): State<Arc<Catalog>>,
    Extension(user): Extension<UserId>,
    Path(domain): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = build_roadmap_view(store.as_ref(), &catalog, &user, &domain).await?;
    Ok(Json(view))
}
