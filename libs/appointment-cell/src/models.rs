// libs/appointment-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared_utils::time::format_display_time;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Whether this status still holds its slot against rebooking. Only a
    /// cancellation frees the slot.
    pub fn blocks_slot(&self) -> bool {
        *self != AppointmentStatus::Cancelled
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("Invalid status value: {}", other)),
        }
    }
}

/// The fully joined appointment record: the row plus the patient, doctor,
/// specialty, location and slot display data every response needs.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentDetail {
    pub id: i32,
    pub patient_id: i32,
    pub doctor_id: i32,
    pub appointment_date: NaiveDate,
    pub time_slot_id: i32,
    pub appointment_type: Option<String>,
    pub status: String,
    pub patient_problem: Option<String>,
    pub patient_age: Option<i32>,
    pub patient_gender: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub doctor_user_id: Option<i32>,
    pub doctor_name: Option<String>,
    pub doctor_email: Option<String>,
    pub degree: Option<String>,
    pub experience_years: Option<i32>,
    pub consultation_fee: Option<f64>,
    pub specialty_name: Option<String>,
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl AppointmentDetail {
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "appointment_date": self.appointment_date,
            "status": self.status,
            "appointment_type": self.appointment_type,
            "patient_problem": self.patient_problem,
            "patient_age": self.patient_age,
            "patient_gender": self.patient_gender,
            "created_at": self.created_at,
            "updated_at": self.updated_at,
            "patient": {
                "id": self.patient_id,
                "name": self.patient_name,
                "email": self.patient_email
            },
            "doctor": {
                "id": self.doctor_id,
                "name": self.doctor_name,
                "email": self.doctor_email,
                "degree": self.degree,
                "experience_years": self.experience_years,
                "consultation_fee": self.consultation_fee,
                "specialty": {
                    "name": self.specialty_name
                },
                "location": {
                    "name": self.location_name,
                    "address": self.location_address
                }
            },
            "time_slot": {
                "id": self.time_slot_id,
                "start_time": self.start_time.and_then(|t| format_display_time(t)),
                "end_time": self.end_time.and_then(|t| format_display_time(t))
            }
        })
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: i32,
    /// YYYY-MM-DD or a full RFC 3339 timestamp; normalized to date-only.
    pub date: String,
    pub time_slot_id: i32,
    pub appointment_type: Option<String>,
    pub patient_problem: Option<String>,
    pub patient_age: Option<i32>,
    pub patient_gender: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// Admin search filters. `status: "all"` means no filter; sort fields are
/// whitelisted before they reach the query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSearchQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub date: Option<NaiveDate>,
    pub doctor_id: Option<i32>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppointmentSearchPage {
    pub appointments: Vec<AppointmentDetail>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilterQuery {
    pub status: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("This time slot is not available")]
    SlotNotAvailable,

    #[error("This time slot is already booked")]
    SlotAlreadyBooked,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Not authorized to access this appointment")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for AppointmentError {
    fn from(e: sqlx::Error) -> Self {
        AppointmentError::Database(e.to_string())
    }
}
