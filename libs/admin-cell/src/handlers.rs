// libs/admin-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use appointment_cell::handlers::map_appointment_error;
use appointment_cell::models::{AppointmentSearchQuery, UpdateStatusRequest};
use appointment_cell::services::booking::AppointmentBookingService;
use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{
    AdminError, CreateDoctorRequest, ToggleAvailabilityRequest, UpdateDoctorRequest,
};
use crate::services::dashboard::DashboardService;
use crate::services::doctor_admin::DoctorAdminService;

fn map_admin_error(e: AdminError) -> AppError {
    match e {
        AdminError::NotFound => AppError::NotFound("Doctor not found".to_string()),
        AdminError::EmailTaken => AppError::BadRequest("Email already registered".to_string()),
        AdminError::InvalidInput(msg) => AppError::BadRequest(msg),
        AdminError::Hash(msg) => AppError::Internal(msg),
        AdminError::Database(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// DOCTOR MANAGEMENT
// ==============================================================================

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorAdminService::new(&state);

    let doctor_id = service.create_doctor(request).await.map_err(map_admin_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor created successfully",
        "doctorId": doctor_id
    })))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i32>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorAdminService::new(&state);

    service
        .update_doctor(doctor_id, request)
        .await
        .map_err(map_admin_error)?;

    Ok(Json(json!({ "message": "Doctor updated successfully" })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorAdminService::new(&state);

    service.delete_doctor(doctor_id).await.map_err(map_admin_error)?;

    Ok(Json(json!({ "message": "Doctor deleted successfully" })))
}

#[axum::debug_handler]
pub async fn toggle_doctor_availability(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i32>,
    Json(request): Json<ToggleAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorAdminService::new(&state);

    service
        .toggle_availability(doctor_id, request.is_available)
        .await
        .map_err(map_admin_error)?;

    let verb = if request.is_available { "enabled" } else { "disabled" };
    Ok(Json(json!({
        "message": format!("Doctor availability {} successfully", verb)
    })))
}

// ==============================================================================
// APPOINTMENT MANAGEMENT
// ==============================================================================

#[axum::debug_handler]
pub async fn search_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let page = booking_service
        .search(query)
        .await
        .map_err(map_appointment_error)?;

    let appointments: Vec<Value> = page.appointments.iter().map(|a| a.to_json()).collect();

    Ok(Json(json!({
        "appointments": appointments,
        "total": page.total,
        "totalPages": page.total_pages,
        "currentPage": page.current_page
    })))
}

/// Same workflow as PATCH /appointments/{id}/status; routed here so the admin
/// UI has it under its own prefix.
#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let (appointment, email) = booking_service
        .update_status(appointment_id, request.status)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "message": "Appointment status updated successfully",
        "appointment": appointment.to_json(),
        "emailStatus": email.status,
        "emailError": email.error
    })))
}

// ==============================================================================
// DASHBOARD
// ==============================================================================

#[axum::debug_handler]
pub async fn get_dashboard_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = DashboardService::new(&state);

    let data = service.dashboard_data().await.map_err(map_admin_error)?;

    Ok(Json(data))
}
