// libs/admin-cell/src/models.rs
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialty_id: i32,
    pub degree: String,
    pub experience_years: i32,
    pub bio: Option<String>,
    pub location_id: Option<i32>,
    pub consultation_fee: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialty_id: Option<i32>,
    pub degree: Option<String>,
    pub experience_years: Option<i32>,
    pub bio: Option<String>,
    pub location_id: Option<i32>,
    pub consultation_fee: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleAvailabilityRequest {
    pub is_available: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DashboardDoctorRow {
    pub id: i32,
    pub user_id: i32,
    pub degree: String,
    pub experience_years: i32,
    pub bio: Option<String>,
    pub consultation_fee: Option<f64>,
    pub is_available: bool,
    pub avg_rating: f64,
    pub review_count: i32,
    pub doctor_name: String,
    pub doctor_email: String,
    pub specialty_id: Option<i32>,
    pub specialty_name: Option<String>,
    pub location_id: Option<i32>,
    pub location_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub total_patients: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for AdminError {
    fn from(e: sqlx::Error) -> Self {
        AdminError::Database(e.to_string())
    }
}
