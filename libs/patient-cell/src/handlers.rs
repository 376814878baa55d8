// libs/patient-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use appointment_cell::handlers::map_appointment_error;
use appointment_cell::services::booking::AppointmentBookingService;
use shared_database::AppState;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{ProfileError, UpdateProfileRequest};
use crate::services::profile::PatientProfileService;

fn map_profile_error(e: ProfileError) -> AppError {
    match e {
        ProfileError::NotFound => AppError::NotFound("User not found".to_string()),
        ProfileError::Database(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = PatientProfileService::new(&state);

    let profile = service.get_profile(user.id).await.map_err(map_profile_error)?;

    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_user_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientProfileService::new(&state);

    let profile = service
        .update_profile(user.id, request)
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": profile["user"]
    })))
}

/// GET /user/appointments: the caller's bookings with display data.
#[axum::debug_handler]
pub async fn get_user_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointments = booking_service
        .list_for_patient(user.id)
        .await
        .map_err(map_appointment_error)?;

    let appointments: Vec<Value> = appointments.iter().map(|a| a.to_json()).collect();

    Ok(Json(json!({ "appointments": appointments })))
}
