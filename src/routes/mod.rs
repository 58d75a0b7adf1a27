use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub mod api;
pub mod views;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(views::router(state.clone()))
        .merge(api::router(state))
}
