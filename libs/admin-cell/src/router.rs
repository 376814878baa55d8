// libs/admin-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::admin_middleware;

use crate::handlers;

/// Everything under /admin requires the administer capability. Doctor reads
/// reuse the public catalog handlers.
pub fn admin_routes(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/doctors", get(doctor_cell::handlers::get_all_doctors))
        .route("/doctors", post(handlers::create_doctor))
        .route("/doctors/{doctor_id}", get(doctor_cell::handlers::get_doctor_by_id))
        .route("/doctors/{doctor_id}", put(handlers::update_doctor))
        .route("/doctors/{doctor_id}", delete(handlers::delete_doctor))
        .route(
            "/doctors/{doctor_id}/availability",
            patch(handlers::toggle_doctor_availability),
        )
        .route("/appointments/search", get(handlers::search_appointments))
        .route(
            "/appointments/{appointment_id}/status",
            patch(handlers::update_appointment_status),
        )
        .route("/dashboard/stats", get(handlers::get_dashboard_data))
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
