// libs/patient-cell/src/services/profile.rs
use serde_json::{json, Value};
use tracing::debug;

use shared_database::{AppState, Database};

use crate::models::{ProfileError, UpdateProfileRequest, UserProfileRow};

pub struct PatientProfileService {
    db: Database,
}

impl PatientProfileService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    pub async fn get_profile(&self, user_id: i32) -> Result<Value, ProfileError> {
        debug!("Fetching profile for user {}", user_id);

        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT
                u.id,
                u.name,
                u.email,
                u.role,
                up.phone_number,
                up.address,
                up.city,
                up.state,
                up.country,
                up.date_of_birth,
                up.gender,
                up.blood_group,
                up.medical_history
            FROM users u
            LEFT JOIN user_profiles up ON u.id = up.user_id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(ProfileError::NotFound)?;

        Ok(json!({
            "user": {
                "id": row.id,
                "name": row.name,
                "email": row.email,
                "role": row.role,
                "profile": {
                    "phoneNumber": row.phone_number,
                    "address": row.address,
                    "city": row.city,
                    "state": row.state,
                    "country": row.country,
                    "dateOfBirth": row.date_of_birth,
                    "gender": row.gender,
                    "bloodGroup": row.blood_group,
                    "medicalHistory": row.medical_history
                }
            }
        }))
    }

    /// Name update plus profile upsert, one transaction.
    pub async fn update_profile(
        &self,
        user_id: i32,
        request: UpdateProfileRequest,
    ) -> Result<Value, ProfileError> {
        debug!("Updating profile for user {}", user_id);

        let mut tx = self.db.pool().begin().await?;

        if let Some(name) = request.name.as_deref() {
            let updated = sqlx::query("UPDATE users SET name = $1 WHERE id = $2")
                .bind(name)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

            if updated.rows_affected() == 0 {
                return Err(ProfileError::NotFound);
            }
        }

        sqlx::query(
            r#"
            INSERT INTO user_profiles (
                user_id, phone_number, address, city, state, country,
                date_of_birth, gender, blood_group, medical_history
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id)
            DO UPDATE SET
                phone_number = EXCLUDED.phone_number,
                address = EXCLUDED.address,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                country = EXCLUDED.country,
                date_of_birth = EXCLUDED.date_of_birth,
                gender = EXCLUDED.gender,
                blood_group = EXCLUDED.blood_group,
                medical_history = EXCLUDED.medical_history
            "#,
        )
        .bind(user_id)
        .bind(request.phone_number.as_deref())
        .bind(request.address.as_deref())
        .bind(request.city.as_deref())
        .bind(request.state.as_deref())
        .bind(request.country.as_deref())
        .bind(request.date_of_birth)
        .bind(request.gender.as_deref())
        .bind(request.blood_group.as_deref())
        .bind(request.medical_history.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_profile(user_id).await
    }
}
