// libs/appointment-cell/src/services/booking.rs
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use notification_cell::models::{AppointmentEmailContext, DispatchReport};
use notification_cell::services::outbox::NotificationOutbox;
use shared_database::{AppState, Database};
use shared_utils::time::{booking_day_of_week, format_display_time, parse_booking_date};

use crate::models::{
    AppointmentDetail, AppointmentError, AppointmentSearchPage, AppointmentSearchQuery,
    AppointmentStatus, BookAppointmentRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;

/// Joined projection shared by every appointment read.
const DETAIL_SELECT: &str = r#"
    SELECT
        a.id,
        a.patient_id,
        a.doctor_id,
        a.appointment_date,
        a.time_slot_id,
        a.appointment_type,
        a.status,
        a.patient_problem,
        a.patient_age,
        a.patient_gender,
        a.created_at,
        a.updated_at,
        u1.name AS patient_name,
        u1.email AS patient_email,
        d.user_id AS doctor_user_id,
        u2.name AS doctor_name,
        u2.email AS doctor_email,
        d.degree,
        d.experience_years,
        d.consultation_fee,
        s.name AS specialty_name,
        l.name AS location_name,
        l.address AS location_address,
        ts.start_time,
        ts.end_time
    FROM appointments a
    LEFT JOIN users u1 ON a.patient_id = u1.id
    LEFT JOIN doctors d ON a.doctor_id = d.id
    LEFT JOIN users u2 ON d.user_id = u2.id
    LEFT JOIN specialties s ON d.specialty_id = s.id
    LEFT JOIN locations l ON d.location_id = l.id
    LEFT JOIN time_slots ts ON a.time_slot_id = ts.id
"#;

pub struct AppointmentBookingService {
    db: Database,
    lifecycle_service: AppointmentLifecycleService,
    outbox: NotificationOutbox,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            lifecycle_service: AppointmentLifecycleService::new(),
            outbox: NotificationOutbox::new(&state.config),
        }
    }

    /// Admission check plus insert, as one transaction. The pre-checks give
    /// precise errors; the partial unique index on non-cancelled
    /// (doctor, date, slot) rows catches the concurrent race the pre-checks
    /// cannot, and is reported the same way.
    pub async fn book_appointment(
        &self,
        patient_id: i32,
        request: BookAppointmentRequest,
    ) -> Result<AppointmentDetail, AppointmentError> {
        let date = parse_booking_date(&request.date).ok_or_else(|| {
            AppointmentError::InvalidInput("Invalid appointment date".to_string())
        })?;
        let day_of_week = booking_day_of_week(date);

        info!(
            "Booking appointment: patient={} doctor={} date={} slot={}",
            patient_id, request.doctor_id, date, request.time_slot_id
        );

        let mut tx = self.db.pool().begin().await?;

        // The doctor must have an enabled recurring rule for this weekday/slot
        let rule: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT id FROM doctor_availability
            WHERE doctor_id = $1
              AND day_of_week = $2
              AND time_slot_id = $3
              AND is_available = TRUE
            "#,
        )
        .bind(request.doctor_id)
        .bind(day_of_week)
        .bind(request.time_slot_id)
        .fetch_optional(&mut *tx)
        .await?;

        if rule.is_none() {
            return Err(AppointmentError::SlotNotAvailable);
        }

        // Any non-cancelled appointment holds the slot
        let taken: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM appointments
            WHERE doctor_id = $1
              AND appointment_date = $2
              AND time_slot_id = $3
              AND status <> 'cancelled'
            "#,
        )
        .bind(request.doctor_id)
        .bind(date)
        .bind(request.time_slot_id)
        .fetch_one(&mut *tx)
        .await?;

        if taken > 0 {
            return Err(AppointmentError::SlotAlreadyBooked);
        }

        let appointment_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO appointments (
                patient_id, doctor_id, appointment_date, time_slot_id,
                appointment_type, status, patient_problem, patient_age, patient_gender
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(patient_id)
        .bind(request.doctor_id)
        .bind(date)
        .bind(request.time_slot_id)
        .bind(request.appointment_type.as_deref())
        .bind(AppointmentStatus::Pending.as_str())
        .bind(request.patient_problem.as_deref())
        .bind(request.patient_age)
        .bind(request.patient_gender.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                warn!(
                    "Concurrent booking lost the race for doctor={} date={} slot={}",
                    request.doctor_id, date, request.time_slot_id
                );
                AppointmentError::SlotAlreadyBooked
            }
            _ => AppointmentError::Database(e.to_string()),
        })?;

        tx.commit().await?;

        info!("Appointment {} booked successfully", appointment_id);
        self.get_appointment(appointment_id).await
    }

    pub async fn get_appointment(
        &self,
        appointment_id: i32,
    ) -> Result<AppointmentDetail, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        let sql = format!("{} WHERE a.id = $1", DETAIL_SELECT);
        let appointment = sqlx::query_as::<_, AppointmentDetail>(&sql)
            .bind(appointment_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(AppointmentError::NotFound)?;

        Ok(appointment)
    }

    /// Every appointment with display data plus the status tally the admin
    /// overview renders.
    pub async fn list_all(&self) -> Result<(Vec<AppointmentDetail>, Value), AppointmentError> {
        let sql = format!(
            "{} ORDER BY a.appointment_date DESC, ts.start_time ASC",
            DETAIL_SELECT
        );
        let appointments = sqlx::query_as::<_, AppointmentDetail>(&sql)
            .fetch_all(self.db.pool())
            .await?;

        let stats = status_stats(&appointments);
        Ok((appointments, stats))
    }

    /// Every appointment belonging to one patient, newest first.
    pub async fn list_for_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<AppointmentDetail>, AppointmentError> {
        let sql = format!(
            "{} WHERE a.patient_id = $1 ORDER BY a.appointment_date DESC",
            DETAIL_SELECT
        );

        let appointments = sqlx::query_as::<_, AppointmentDetail>(&sql)
            .bind(patient_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(appointments)
    }

    /// The authenticated patient's appointments with one doctor, optionally
    /// filtered by status.
    pub async fn list_for_doctor_and_patient(
        &self,
        doctor_id: i32,
        patient_id: i32,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<AppointmentDetail>, AppointmentError> {
        let sql = format!(
            r#"{}
            WHERE a.doctor_id = $1
              AND a.patient_id = $2
              AND ($3::text IS NULL OR a.status = $3)
            ORDER BY a.appointment_date DESC
            "#,
            DETAIL_SELECT
        );

        let appointments = sqlx::query_as::<_, AppointmentDetail>(&sql)
            .bind(doctor_id)
            .bind(patient_id)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(self.db.pool())
            .await?;

        Ok(appointments)
    }

    /// Admin search with filters, sorting and pagination.
    pub async fn search(
        &self,
        query: AppointmentSearchQuery,
    ) -> Result<AppointmentSearchPage, AppointmentError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) * limit;

        let search = query
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("%{}%", s.trim()));

        let status = match query.status.as_deref().filter(|s| *s != "all") {
            Some(raw) => Some(
                raw.parse::<AppointmentStatus>()
                    .map_err(AppointmentError::InvalidInput)?,
            ),
            None => None,
        };

        // Sort columns come from a whitelist, never from the caller verbatim.
        let sort_by = match query.sort_by.as_deref() {
            Some("status") => "status",
            Some("appointment_type") => "appointment_type",
            _ => "appointment_date",
        };
        let sort_order = match query.sort_order.as_deref() {
            Some(order) if order.eq_ignore_ascii_case("asc") => "ASC",
            _ => "DESC",
        };

        let filters = r#"
            WHERE ($1::text IS NULL
                   OR u1.name ILIKE $1
                   OR u2.name ILIKE $1
                   OR a.appointment_type ILIKE $1)
              AND ($2::text IS NULL OR a.status = $2)
              AND ($3::date IS NULL OR a.appointment_date = $3)
              AND ($4::int IS NULL OR a.doctor_id = $4)
        "#;

        let count_sql = format!(
            r#"
            SELECT COUNT(*)
            FROM appointments a
            LEFT JOIN users u1 ON a.patient_id = u1.id
            LEFT JOIN doctors d ON a.doctor_id = d.id
            LEFT JOIN users u2 ON d.user_id = u2.id
            {}
            "#,
            filters
        );

        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(search.as_deref())
            .bind(status.map(|s| s.as_str()))
            .bind(query.date)
            .bind(query.doctor_id)
            .fetch_one(self.db.pool())
            .await?;

        let rows_sql = format!(
            "{} {} ORDER BY a.{} {} LIMIT $5 OFFSET $6",
            DETAIL_SELECT, filters, sort_by, sort_order
        );

        let appointments = sqlx::query_as::<_, AppointmentDetail>(&rows_sql)
            .bind(search.as_deref())
            .bind(status.map(|s| s.as_str()))
            .bind(query.date)
            .bind(query.doctor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db.pool())
            .await?;

        Ok(AppointmentSearchPage {
            appointments,
            total,
            total_pages: (total + limit - 1) / limit,
            current_page: page,
        })
    }

    /// The status workflow: validate the transition and persist it in a
    /// transaction, then dispatch the notification after the commit. A failed
    /// send is reported in the result, never rolled back.
    pub async fn update_status(
        &self,
        appointment_id: i32,
        new_status: AppointmentStatus,
    ) -> Result<(AppointmentDetail, DispatchReport), AppointmentError> {
        let mut tx = self.db.pool().begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM appointments WHERE id = $1 FOR UPDATE")
                .bind(appointment_id)
                .fetch_optional(&mut *tx)
                .await?;

        let current = current.ok_or(AppointmentError::NotFound)?;
        let current: AppointmentStatus = current
            .parse()
            .map_err(|_| AppointmentError::Database(format!("corrupt status: {}", current)))?;

        self.lifecycle_service
            .validate_status_transition(current, new_status)?;

        sqlx::query(
            "UPDATE appointments SET status = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(new_status.as_str())
        .bind(appointment_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "Appointment {} status updated: {} -> {}",
            appointment_id, current, new_status
        );

        let appointment = self.get_appointment(appointment_id).await?;
        let report = self
            .outbox
            .dispatch_status_change(&email_context(&appointment, new_status))
            .await;

        Ok((appointment, report))
    }

    /// Convenience wrapper forcing a cancellation through the same workflow.
    /// Non-admin callers may only cancel their own appointments.
    pub async fn cancel(
        &self,
        appointment_id: i32,
        acting_patient: Option<i32>,
    ) -> Result<(AppointmentDetail, DispatchReport), AppointmentError> {
        let appointment = self.get_appointment(appointment_id).await?;

        if let Some(patient_id) = acting_patient {
            if appointment.patient_id != patient_id {
                return Err(AppointmentError::Forbidden);
            }
        }

        self.update_status(appointment_id, AppointmentStatus::Cancelled)
            .await
    }
}

fn status_stats(appointments: &[AppointmentDetail]) -> Value {
    let count = |status: AppointmentStatus| {
        appointments
            .iter()
            .filter(|a| a.status == status.as_str())
            .count()
    };

    json!({
        "total": appointments.len(),
        "confirmed": count(AppointmentStatus::Confirmed),
        "pending": count(AppointmentStatus::Pending),
        "cancelled": count(AppointmentStatus::Cancelled),
        "completed": count(AppointmentStatus::Completed),
    })
}

fn email_context(
    appointment: &AppointmentDetail,
    new_status: AppointmentStatus,
) -> AppointmentEmailContext {
    AppointmentEmailContext {
        patient_name: appointment
            .patient_name
            .clone()
            .unwrap_or_else(|| "Patient".to_string()),
        patient_email: appointment.patient_email.clone(),
        doctor_name: appointment
            .doctor_name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        specialty_name: appointment.specialty_name.clone(),
        appointment_date: appointment.appointment_date,
        start_time: appointment.start_time.and_then(|t| format_display_time(t)),
        end_time: appointment.end_time.and_then(|t| format_display_time(t)),
        new_status: new_status.to_string(),
    }
}
