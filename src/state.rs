use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, engine::ProgressStore, models::catalog::Catalog};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProgressStore>,
    pub catalog: Arc<Catalog>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<dyn ProgressStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Arc<Catalog> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
