use std::sync::Arc;

use axum::{routing::get, Router};

use admin_cell::router::admin_routes;
use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use location_cell::router::location_routes;
use patient_cell::router::user_routes;
use review_cell::router::review_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "MedCare API is running" }))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/locations", location_routes(state.clone()))
        .nest("/reviews", review_routes(state.clone()))
        .nest("/user", user_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}
