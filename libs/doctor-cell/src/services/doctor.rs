// libs/doctor-cell/src/services/doctor.rs
use serde_json::{json, Value};
use tracing::debug;

use shared_database::{AppState, Database};
use shared_utils::time::format_display_time;

use crate::models::{
    DoctorDetailRow, DoctorError, DoctorListQuery, DoctorListRow, Specialty, TopDoctor,
    WeeklyAvailabilityRow,
};

const DEFAULT_PAGE_SIZE: i64 = 6;

pub struct DoctorService {
    db: Database,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// Highest rated bookable doctors for the landing page.
    pub async fn top_doctors(&self) -> Result<Vec<TopDoctor>, DoctorError> {
        let doctors = sqlx::query_as::<_, TopDoctor>(
            r#"
            SELECT
                d.id,
                u.name,
                d.degree,
                d.experience_years,
                d.avg_rating,
                d.review_count,
                s.name AS specialty_name
            FROM doctors d
            JOIN users u ON d.user_id = u.id
            LEFT JOIN specialties s ON d.specialty_id = s.id
            WHERE d.is_available = TRUE
            ORDER BY d.avg_rating DESC, d.review_count DESC
            LIMIT 6
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(doctors)
    }

    /// Filtered, paginated doctor listing plus the specialty catalog the
    /// frontend uses to build its filter controls.
    pub async fn list_doctors(&self, query: DoctorListQuery) -> Result<Value, DoctorError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 50);
        let offset = (page - 1) * limit;
        let min_rating = query.min_rating.unwrap_or(0.0);
        let min_experience = query.min_experience.unwrap_or(0);
        let search = query
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("%{}%", s.trim()));

        debug!("Listing doctors page={} limit={}", page, limit);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM doctors d
            JOIN users u ON d.user_id = u.id
            LEFT JOIN specialties s ON d.specialty_id = s.id
            WHERE d.is_available = TRUE
              AND d.avg_rating >= $1
              AND d.experience_years >= $2
              AND ($3::text IS NULL OR u.name ILIKE $3 OR s.name ILIKE $3)
              AND ($4::text IS NULL OR s.name = $4)
            "#,
        )
        .bind(min_rating)
        .bind(min_experience)
        .bind(search.as_deref())
        .bind(query.specialty.as_deref())
        .fetch_one(self.db.pool())
        .await?;

        let specialties = self.specialties().await?;

        if total == 0 {
            return Ok(json!({
                "doctors": [],
                "total": 0,
                "totalPages": 0,
                "currentPage": page,
                "specialties": specialties
            }));
        }

        let rows = sqlx::query_as::<_, DoctorListRow>(
            r#"
            SELECT
                d.id,
                d.degree,
                d.experience_years,
                d.bio,
                d.avg_rating,
                d.review_count,
                d.consultation_fee,
                u.id AS user_id,
                u.name,
                s.id AS specialty_id,
                s.name AS specialty_name,
                l.id AS location_id,
                l.name AS location_name,
                l.city
            FROM doctors d
            JOIN users u ON d.user_id = u.id
            LEFT JOIN specialties s ON d.specialty_id = s.id
            LEFT JOIN locations l ON d.location_id = l.id
            WHERE d.is_available = TRUE
              AND d.avg_rating >= $1
              AND d.experience_years >= $2
              AND ($3::text IS NULL OR u.name ILIKE $3 OR s.name ILIKE $3)
              AND ($4::text IS NULL OR s.name = $4)
            ORDER BY d.avg_rating DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(min_rating)
        .bind(min_experience)
        .bind(search.as_deref())
        .bind(query.specialty.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.db.pool())
        .await?;

        let doctors: Vec<Value> = rows
            .into_iter()
            .map(|d| {
                json!({
                    "id": d.id,
                    "userId": d.user_id,
                    "name": d.name,
                    "degree": d.degree,
                    "experienceYears": d.experience_years,
                    "bio": d.bio,
                    "avgRating": d.avg_rating,
                    "reviewCount": d.review_count,
                    "consultationFee": d.consultation_fee,
                    "specialty": {
                        "id": d.specialty_id,
                        "name": d.specialty_name
                    },
                    "location": {
                        "id": d.location_id,
                        "name": d.location_name,
                        "city": d.city
                    }
                })
            })
            .collect();

        let total_pages = (total + limit - 1) / limit;

        Ok(json!({
            "doctors": doctors,
            "total": total,
            "totalPages": total_pages,
            "currentPage": page,
            "specialties": specialties
        }))
    }

    /// Doctor detail with the recurring weekly availability pattern.
    pub async fn get_doctor(&self, doctor_id: i32) -> Result<Value, DoctorError> {
        let doctor = sqlx::query_as::<_, DoctorDetailRow>(
            r#"
            SELECT
                d.id,
                d.degree,
                d.experience_years,
                d.bio,
                d.consultation_fee,
                d.is_available,
                d.avg_rating,
                d.review_count,
                u.id AS user_id,
                u.name,
                up.profile_picture,
                s.id AS specialty_id,
                s.name AS specialty_name,
                l.id AS location_id,
                l.name AS location_name,
                l.address,
                l.city,
                l.state
            FROM doctors d
            JOIN users u ON d.user_id = u.id
            LEFT JOIN user_profiles up ON u.id = up.user_id
            LEFT JOIN specialties s ON d.specialty_id = s.id
            LEFT JOIN locations l ON d.location_id = l.id
            WHERE d.id = $1
            "#,
        )
        .bind(doctor_id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(DoctorError::NotFound)?;

        let availability = sqlx::query_as::<_, WeeklyAvailabilityRow>(
            r#"
            SELECT da.day_of_week, ts.id AS time_slot_id, ts.start_time, ts.end_time
            FROM doctor_availability da
            JOIN time_slots ts ON da.time_slot_id = ts.id
            WHERE da.doctor_id = $1 AND da.is_available = TRUE
            ORDER BY da.day_of_week ASC, ts.start_time ASC
            "#,
        )
        .bind(doctor_id)
        .fetch_all(self.db.pool())
        .await?;

        let availability: Vec<Value> = availability
            .into_iter()
            .map(|a| {
                json!({
                    "dayOfWeek": a.day_of_week,
                    "timeSlotId": a.time_slot_id,
                    "startTime": format_display_time(a.start_time),
                    "endTime": format_display_time(a.end_time)
                })
            })
            .collect();

        Ok(json!({
            "doctor": {
                "id": doctor.id,
                "userId": doctor.user_id,
                "specialtyId": doctor.specialty_id,
                "degree": doctor.degree,
                "experienceYears": doctor.experience_years,
                "bio": doctor.bio,
                "locationId": doctor.location_id,
                "consultationFee": doctor.consultation_fee,
                "isAvailable": doctor.is_available,
                "avgRating": doctor.avg_rating,
                "reviewCount": doctor.review_count,
                "user": {
                    "id": doctor.user_id,
                    "name": doctor.name,
                    "profilePicture": doctor.profile_picture
                },
                "specialty": doctor.specialty_id.map(|id| json!({
                    "id": id,
                    "name": doctor.specialty_name
                })),
                "location": doctor.location_id.map(|id| json!({
                    "id": id,
                    "name": doctor.location_name,
                    "address": doctor.address,
                    "city": doctor.city,
                    "state": doctor.state
                }))
            },
            "availability": availability
        }))
    }

    async fn specialties(&self) -> Result<Vec<Specialty>, DoctorError> {
        let specialties =
            sqlx::query_as::<_, Specialty>("SELECT id, name FROM specialties ORDER BY name")
                .fetch_all(self.db.pool())
                .await?;
        Ok(specialties)
    }
}
