// libs/review-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub patient_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub doctor_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListQuery {
    pub doctor_id: Option<i32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Invalid input")]
    InvalidInput,

    #[error("You can only review doctors after completing an appointment")]
    NotEligible,

    #[error("You have already reviewed this doctor")]
    AlreadyReviewed,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for ReviewError {
    fn from(e: sqlx::Error) -> Self {
        ReviewError::Database(e.to_string())
    }
}
