// libs/admin-cell/src/services/dashboard.rs
use serde_json::{json, Value};
use tracing::debug;

use appointment_cell::services::booking::AppointmentBookingService;
use shared_database::{AppState, Database};

use crate::models::{AdminError, DashboardDoctorRow};

pub struct DashboardService {
    db: Database,
    booking_service: AppointmentBookingService,
}

impl DashboardService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            booking_service: AppointmentBookingService::new(state),
        }
    }

    /// Admin overview: every appointment with display data, the status
    /// tally, and every doctor with their appointment count.
    pub async fn dashboard_data(&self) -> Result<Value, AdminError> {
        debug!("Building admin dashboard data");

        let (appointments, stats) = self
            .booking_service
            .list_all()
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?;

        let appointments: Vec<Value> = appointments.iter().map(|a| a.to_json()).collect();

        let doctors = sqlx::query_as::<_, DashboardDoctorRow>(
            r#"
            SELECT
                d.id,
                d.user_id,
                d.degree,
                d.experience_years,
                d.bio,
                d.consultation_fee,
                d.is_available,
                d.avg_rating,
                d.review_count,
                u.name AS doctor_name,
                u.email AS doctor_email,
                s.id AS specialty_id,
                s.name AS specialty_name,
                l.id AS location_id,
                l.name AS location_name,
                l.city,
                l.country,
                COUNT(DISTINCT a.id) AS total_patients
            FROM doctors d
            JOIN users u ON d.user_id = u.id
            LEFT JOIN specialties s ON d.specialty_id = s.id
            LEFT JOIN locations l ON d.location_id = l.id
            LEFT JOIN appointments a ON d.id = a.doctor_id
            GROUP BY d.id, u.name, u.email, s.id, s.name, l.id, l.name, l.city, l.country
            ORDER BY d.id DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let doctors: Vec<Value> = doctors
            .into_iter()
            .map(|d| {
                json!({
                    "id": d.id,
                    "userId": d.user_id,
                    "specialtyId": d.specialty_id,
                    "degree": d.degree,
                    "experienceYears": d.experience_years,
                    "bio": d.bio,
                    "locationId": d.location_id,
                    "consultationFee": d.consultation_fee,
                    "isAvailable": d.is_available,
                    "avgRating": d.avg_rating,
                    "reviewCount": d.review_count,
                    "user": {
                        "id": d.user_id,
                        "name": d.doctor_name,
                        "email": d.doctor_email
                    },
                    "specialty": {
                        "id": d.specialty_id,
                        "name": d.specialty_name
                    },
                    "location": {
                        "id": d.location_id,
                        "name": d.location_name,
                        "city": d.city,
                        "country": d.country
                    },
                    "totalPatients": d.total_patients
                })
            })
            .collect();

        Ok(json!({
            "appointments": appointments,
            "stats": stats,
            "doctors": doctors
        }))
    }
}
