// libs/admin-cell/src/services/doctor_admin.rs
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use tracing::{debug, info};

use shared_database::{AppState, Database};

use crate::models::{AdminError, CreateDoctorRequest, UpdateDoctorRequest};

/// Default schedule for a freshly created doctor: Monday through Friday over
/// the whole slot catalog.
const DEFAULT_WORK_DAYS: std::ops::RangeInclusive<i16> = 1..=5;

pub struct DoctorAdminService {
    db: Database,
}

impl DoctorAdminService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// User row, doctor row and the default weekly availability, all in one
    /// transaction.
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<i32, AdminError> {
        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
            || request.degree.trim().is_empty()
        {
            return Err(AdminError::InvalidInput("Missing required fields".to_string()));
        }

        let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&request.email)
            .fetch_optional(self.db.pool())
            .await?;

        if existing.is_some() {
            return Err(AdminError::EmailTaken);
        }

        let password_hash = hash_password(&request.password)?;

        let mut tx = self.db.pool().begin().await?;

        let user_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, 'doctor')
            RETURNING id
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => AdminError::EmailTaken,
            _ => AdminError::Database(e.to_string()),
        })?;

        let doctor_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO doctors (
                user_id, specialty_id, degree, experience_years,
                bio, location_id, consultation_fee, is_available,
                avg_rating, review_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, 0, 0)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(request.specialty_id)
        .bind(&request.degree)
        .bind(request.experience_years)
        .bind(request.bio.as_deref())
        .bind(request.location_id)
        .bind(request.consultation_fee)
        .fetch_one(&mut *tx)
        .await?;

        let slot_ids: Vec<i32> = sqlx::query_scalar("SELECT id FROM time_slots ORDER BY start_time")
            .fetch_all(&mut *tx)
            .await?;

        for day in DEFAULT_WORK_DAYS {
            for slot_id in &slot_ids {
                sqlx::query(
                    r#"
                    INSERT INTO doctor_availability (doctor_id, day_of_week, time_slot_id, is_available)
                    VALUES ($1, $2, $3, TRUE)
                    "#,
                )
                .bind(doctor_id)
                .bind(day)
                .bind(slot_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        info!("Doctor {} created for user {}", doctor_id, user_id);
        Ok(doctor_id)
    }

    pub async fn update_doctor(
        &self,
        doctor_id: i32,
        request: UpdateDoctorRequest,
    ) -> Result<(), AdminError> {
        debug!("Updating doctor {}", doctor_id);

        let mut tx = self.db.pool().begin().await?;

        let user_id: Option<i32> = sqlx::query_scalar("SELECT user_id FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .fetch_optional(&mut *tx)
            .await?;

        let user_id = user_id.ok_or(AdminError::NotFound)?;

        if request.name.is_some() || request.email.is_some() {
            sqlx::query(
                r#"
                UPDATE users
                SET name = COALESCE($1, name),
                    email = COALESCE($2, email)
                WHERE id = $3
                "#,
            )
            .bind(request.name.as_deref())
            .bind(request.email.as_deref())
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            UPDATE doctors
            SET specialty_id = COALESCE($1, specialty_id),
                degree = COALESCE($2, degree),
                experience_years = COALESCE($3, experience_years),
                bio = COALESCE($4, bio),
                location_id = COALESCE($5, location_id),
                consultation_fee = COALESCE($6, consultation_fee)
            WHERE id = $7
            "#,
        )
        .bind(request.specialty_id)
        .bind(request.degree.as_deref())
        .bind(request.experience_years)
        .bind(request.bio.as_deref())
        .bind(request.location_id)
        .bind(request.consultation_fee)
        .bind(doctor_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Removes the doctor with their availability, appointments and user
    /// account, one transaction.
    pub async fn delete_doctor(&self, doctor_id: i32) -> Result<(), AdminError> {
        let mut tx = self.db.pool().begin().await?;

        let user_id: Option<i32> = sqlx::query_scalar("SELECT user_id FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .fetch_optional(&mut *tx)
            .await?;

        let user_id = user_id.ok_or(AdminError::NotFound)?;

        sqlx::query("DELETE FROM doctor_availability WHERE doctor_id = $1")
            .bind(doctor_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM appointments WHERE doctor_id = $1")
            .bind(doctor_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM reviews WHERE doctor_id = $1")
            .bind(doctor_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }

    /// Global bookability toggle; availability rules are untouched.
    pub async fn toggle_availability(
        &self,
        doctor_id: i32,
        is_available: bool,
    ) -> Result<(), AdminError> {
        let updated = sqlx::query("UPDATE doctors SET is_available = $1 WHERE id = $2")
            .bind(is_available)
            .bind(doctor_id)
            .execute(self.db.pool())
            .await?;

        if updated.rows_affected() == 0 {
            return Err(AdminError::NotFound);
        }

        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String, AdminError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AdminError::Hash(e.to_string()))
}
