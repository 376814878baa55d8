// libs/review-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CreateReviewRequest, ReviewError, ReviewListQuery};
use crate::services::review::ReviewService;

fn map_review_error(e: ReviewError) -> AppError {
    match e {
        ReviewError::InvalidInput => AppError::BadRequest("Invalid input".to_string()),
        ReviewError::NotEligible => AppError::Forbidden(e.to_string()),
        ReviewError::AlreadyReviewed => AppError::BadRequest(e.to_string()),
        ReviewError::Database(msg) => AppError::Database(msg),
    }
}

/// GET /reviews?doctorId=N
#[axum::debug_handler]
pub async fn get_doctor_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = query
        .doctor_id
        .ok_or_else(|| AppError::BadRequest("Doctor ID is required".to_string()))?;

    let service = ReviewService::new(&state);

    let reviews = service
        .doctor_reviews(doctor_id)
        .await
        .map_err(map_review_error)?;

    Ok(Json(json!({ "reviews": reviews })))
}

/// POST /reviews
#[axum::debug_handler]
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ReviewService::new(&state);

    let review = service
        .create_review(user.id, request)
        .await
        .map_err(map_review_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Review added successfully",
        "review": review
    })))
}
