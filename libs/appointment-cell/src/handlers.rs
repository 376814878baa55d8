// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::auth::{AuthCapabilities, User};
use shared_models::error::AppError;

use crate::models::{
    AppointmentError, AppointmentStatus, BookAppointmentRequest, StatusFilterQuery,
    UpdateStatusRequest,
};
use crate::services::booking::AppointmentBookingService;

pub fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::SlotNotAvailable => {
            AppError::BadRequest("This time slot is not available".to_string())
        }
        AppointmentError::SlotAlreadyBooked => {
            AppError::BadRequest("This time slot is already booked".to_string())
        }
        AppointmentError::InvalidInput(msg) => AppError::BadRequest(msg),
        AppointmentError::InvalidStatusTransition { .. } => AppError::BadRequest(e.to_string()),
        AppointmentError::Forbidden => {
            AppError::Forbidden("Not authorized to access this appointment".to_string())
        }
        AppointmentError::Database(msg) => AppError::Database(msg),
    }
}

/// POST /appointments
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Extension(caps): Extension<AuthCapabilities>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    if !caps.can_book {
        return Err(AppError::Forbidden(
            "Not authorized to book appointments".to_string(),
        ));
    }

    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service
        .book_appointment(user.id, request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointment": appointment.to_json() })))
}

/// GET /appointments: full listing with status stats, admin only.
#[axum::debug_handler]
pub async fn get_all_appointments(
    State(state): State<Arc<AppState>>,
    Extension(caps): Extension<AuthCapabilities>,
) -> Result<Json<Value>, AppError> {
    if !caps.can_administer {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let booking_service = AppointmentBookingService::new(&state);

    let (appointments, stats) = booking_service
        .list_all()
        .await
        .map_err(map_appointment_error)?;

    let appointments: Vec<Value> = appointments.iter().map(|a| a.to_json()).collect();

    Ok(Json(json!({ "appointments": appointments, "stats": stats })))
}

/// GET /appointments/{id}: viewable by the patient, the doctor involved, or an admin.
#[axum::debug_handler]
pub async fn get_appointment_by_id(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<i32>,
    Extension(user): Extension<User>,
    Extension(caps): Extension<AuthCapabilities>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    let is_patient = appointment.patient_id == user.id;
    let is_doctor = appointment.doctor_user_id == Some(user.id);

    if !(caps.can_administer || (caps.can_view_own && (is_patient || is_doctor))) {
        return Err(AppError::Forbidden(
            "Not authorized to view this appointment".to_string(),
        ));
    }

    Ok(Json(json!({ "appointment": appointment.to_json() })))
}

/// PATCH /appointments/{id}/status: admin-driven workflow step. The email
/// outcome is reported alongside the updated appointment; a delivery failure
/// never undoes the status change.
#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<i32>,
    Extension(caps): Extension<AuthCapabilities>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    if !caps.can_administer {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

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

/// PATCH /appointments/{id}/cancel
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<i32>,
    Extension(user): Extension<User>,
    Extension(caps): Extension<AuthCapabilities>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);

    // Admins may cancel anything; everyone else only their own.
    let acting_patient = if caps.can_administer { None } else { Some(user.id) };

    let (appointment, email) = booking_service
        .cancel(appointment_id, acting_patient)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled successfully",
        "appointment": appointment.to_json(),
        "emailStatus": email.status
    })))
}

/// GET /appointments/doctor/{doctorId}/user: the caller's appointments with
/// one doctor, optionally filtered by status.
#[axum::debug_handler]
pub async fn get_doctor_appointments_for_user(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i32>,
    Query(query): Query<StatusFilterQuery>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(
            raw.parse::<AppointmentStatus>()
                .map_err(AppError::BadRequest)?,
        ),
        None => None,
    };

    let booking_service = AppointmentBookingService::new(&state);

    let appointments = booking_service
        .list_for_doctor_and_patient(doctor_id, user.id, status)
        .await
        .map_err(map_appointment_error)?;

    let appointments: Vec<Value> = appointments.iter().map(|a| a.to_json()).collect();

    Ok(Json(json!({ "appointments": appointments })))
}
