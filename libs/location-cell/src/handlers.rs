// libs/location-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{LocationQuery, LocationRow};

/// GET /locations?doctorId=N returns where a doctor practices.
#[axum::debug_handler]
pub async fn get_doctor_locations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = query
        .doctor_id
        .ok_or_else(|| AppError::BadRequest("Valid doctor ID is required".to_string()))?;

    let rows = sqlx::query_as::<_, LocationRow>(
        r#"
        SELECT l.id, l.name, l.address, l.city
        FROM locations l
        JOIN doctors d ON d.location_id = l.id
        WHERE d.id = $1
        "#,
    )
    .bind(doctor_id)
    .fetch_all(state.db.pool())
    .await
    .map_err(|e| AppError::Database(e.to_string()))?;

    let locations: Vec<Value> = rows
        .into_iter()
        .map(|l| {
            let full_address = format!(
                "{}, {}, {}",
                l.name,
                l.address.as_deref().unwrap_or(""),
                l.city.as_deref().unwrap_or("")
            );
            json!({
                "id": l.id,
                "name": l.name,
                "address": l.address,
                "city": l.city,
                "fullAddress": full_address
            })
        })
        .collect();

    Ok(Json(json!({ "locations": locations })))
}
