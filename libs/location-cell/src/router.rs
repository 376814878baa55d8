// libs/location-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers;

pub fn location_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::get_doctor_locations))
        .with_state(state)
}
