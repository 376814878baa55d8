// libs/doctor-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// One row of a doctor's recurring weekly pattern, joined with the slot
/// catalog. day_of_week uses Monday=1 .. Sunday=7.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AvailabilityPatternRow {
    pub day_of_week: i16,
    pub time_slot_id: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookedSlotRow {
    pub appointment_date: NaiveDate,
    pub time_slot_id: i32,
}

/// A slot as presented to the booking UI. Booked slots stay in the list with
/// is_available=false so the caller can render a disabled option.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub id: i32,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlots {
    pub date: String,
    pub day: String,
    pub month: String,
    pub full_date: String,
    pub time_slots: Vec<SlotAvailability>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

// ==============================================================================
// DOCTOR CATALOG MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopDoctor {
    pub id: i32,
    pub name: String,
    pub degree: String,
    pub experience_years: i32,
    pub avg_rating: f64,
    pub review_count: i32,
    pub specialty_name: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DoctorListRow {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub degree: String,
    pub experience_years: i32,
    pub bio: Option<String>,
    pub avg_rating: f64,
    pub review_count: i32,
    pub consultation_fee: Option<f64>,
    pub specialty_id: Option<i32>,
    pub specialty_name: Option<String>,
    pub location_id: Option<i32>,
    pub location_name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DoctorDetailRow {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub profile_picture: Option<String>,
    pub degree: String,
    pub experience_years: i32,
    pub bio: Option<String>,
    pub consultation_fee: Option<f64>,
    pub is_available: bool,
    pub avg_rating: f64,
    pub review_count: i32,
    pub specialty_id: Option<i32>,
    pub specialty_name: Option<String>,
    pub location_id: Option<i32>,
    pub location_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Specialty {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeeklyAvailabilityRow {
    pub day_of_week: i16,
    pub time_slot_id: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub specialty: Option<String>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<f64>,
    #[serde(rename = "minExperience")]
    pub min_experience: Option<i32>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for DoctorError {
    fn from(e: sqlx::Error) -> Self {
        DoctorError::Database(e.to_string())
    }
}
