use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, services::result_store::ResultStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResultStore>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<dyn ResultStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
