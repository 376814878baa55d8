// libs/review-cell/src/services/review.rs
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_database::{AppState, Database};

use crate::models::{CreateReviewRequest, ReviewError, ReviewRow};

pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    pub async fn doctor_reviews(&self, doctor_id: i32) -> Result<Vec<Value>, ReviewError> {
        debug!("Fetching reviews for doctor {}", doctor_id);

        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT r.id, r.rating, r.comment, r.created_at, u.name AS patient_name
            FROM reviews r
            JOIN users u ON r.patient_id = u.id
            WHERE r.doctor_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(doctor_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "rating": r.rating,
                    "comment": r.comment,
                    "createdAt": r.created_at,
                    "patient": { "name": r.patient_name }
                })
            })
            .collect())
    }

    /// Insert the review and refresh the doctor's rating aggregates in one
    /// transaction. Only patients with a completed appointment may review,
    /// once per doctor.
    pub async fn create_review(
        &self,
        patient_id: i32,
        request: CreateReviewRequest,
    ) -> Result<Value, ReviewError> {
        if request.rating < 1 || request.rating > 5 {
            return Err(ReviewError::InvalidInput);
        }

        let completed: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT id FROM appointments
            WHERE doctor_id = $1
              AND patient_id = $2
              AND status = 'completed'
            LIMIT 1
            "#,
        )
        .bind(request.doctor_id)
        .bind(patient_id)
        .fetch_optional(self.db.pool())
        .await?;

        if completed.is_none() {
            return Err(ReviewError::NotEligible);
        }

        let mut tx = self.db.pool().begin().await?;

        let review: (i32, i32, Option<String>) = sqlx::query_as(
            r#"
            INSERT INTO reviews (doctor_id, patient_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, rating, comment
            "#,
        )
        .bind(request.doctor_id)
        .bind(patient_id)
        .bind(request.rating)
        .bind(request.comment.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => ReviewError::AlreadyReviewed,
            _ => ReviewError::Database(e.to_string()),
        })?;

        // Refresh the denormalized aggregates on the doctor row
        sqlx::query(
            r#"
            UPDATE doctors
            SET avg_rating = stats.avg_rating,
                review_count = stats.review_count
            FROM (
                SELECT AVG(rating) AS avg_rating, COUNT(*) AS review_count
                FROM reviews
                WHERE doctor_id = $1
            ) AS stats
            WHERE doctors.id = $1
            "#,
        )
        .bind(request.doctor_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "Review {} created for doctor {} by patient {}",
            review.0, request.doctor_id, patient_id
        );

        Ok(json!({
            "id": review.0,
            "rating": review.1,
            "comment": review.2
        }))
    }
}
