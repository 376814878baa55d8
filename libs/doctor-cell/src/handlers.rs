// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::time::parse_booking_date;

use crate::models::{AvailabilityQuery, DoctorError, DoctorListQuery};
use crate::services::availability::AvailabilityService;
use crate::services::doctor::DoctorService;

fn map_doctor_error(e: DoctorError) -> AppError {
    match e {
        DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
        DoctorError::InvalidInput(msg) => AppError::BadRequest(msg),
        DoctorError::Database(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn get_top_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);

    let doctors = service.top_doctors().await.map_err(map_doctor_error)?;

    Ok(Json(json!({ "doctors": doctors })))
}

#[axum::debug_handler]
pub async fn get_all_doctors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);

    let response = service.list_doctors(query).await.map_err(map_doctor_error)?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_doctor_by_id(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&state);

    let response = service.get_doctor(doctor_id).await.map_err(map_doctor_error)?;

    Ok(Json(response))
}

/// GET /doctors/{id}/availability?date=YYYY-MM-DD
///
/// Rolling 15-day window starting at `date` (today when omitted).
#[axum::debug_handler]
pub async fn get_doctor_availability(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i32>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let from = match query.date.as_deref() {
        Some(raw) => parse_booking_date(raw).ok_or_else(|| {
            AppError::BadRequest("Invalid date, expected YYYY-MM-DD".to_string())
        })?,
        None => Utc::now().date_naive(),
    };

    let service = AvailabilityService::new(&state);

    let dates = service
        .available_days(doctor_id, from)
        .await
        .map_err(map_doctor_error)?;

    Ok(Json(json!({ "dates": dates })))
}
