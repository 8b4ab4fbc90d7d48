// src/handlers/domains.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{error::AppError, models::catalog::Catalog};

/// Lists the learning domains in catalog order.
pub async fn list_domains(
    State(catalog): State<Arc<Catalog>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({ "domains": catalog.domain_names() })))
}
