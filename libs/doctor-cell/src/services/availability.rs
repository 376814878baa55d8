// libs/doctor-cell/src/services/availability.rs
use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use tracing::debug;

use shared_database::{AppState, Database};
use shared_utils::time::{booking_day_of_week, format_display_time};

use crate::models::{AvailabilityPatternRow, BookedSlotRow, DaySlots, DoctorError, SlotAvailability};

/// Rolling window length: a query for date D answers for D through D+14
/// inclusive, i.e. 15 calendar days.
pub const AVAILABILITY_HORIZON_DAYS: i64 = 14;

pub struct AvailabilityService {
    db: Database,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
        }
    }

    /// Resolve the bookable slots for every day in the rolling window,
    /// factoring the doctor's recurring weekly pattern against appointments
    /// that already hold a slot. Recomputed fresh on every call.
    pub async fn available_days(
        &self,
        doctor_id: i32,
        from: NaiveDate,
    ) -> Result<Vec<DaySlots>, DoctorError> {
        debug!("Resolving availability for doctor {} from {}", doctor_id, from);

        self.ensure_doctor_exists(doctor_id).await?;

        let pattern = self.weekly_pattern(doctor_id).await?;
        let booked = self
            .booked_slots(doctor_id, from, from + Duration::days(AVAILABILITY_HORIZON_DAYS))
            .await?;

        let days: Vec<DaySlots> =
            day_grid(from, AVAILABILITY_HORIZON_DAYS, &pattern, &booked).collect();

        debug!(
            "Resolved {} days of availability for doctor {}",
            days.len(),
            doctor_id
        );
        Ok(days)
    }

    async fn ensure_doctor_exists(&self, doctor_id: i32) -> Result<(), DoctorError> {
        let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .fetch_optional(self.db.pool())
            .await?;

        if exists.is_none() {
            return Err(DoctorError::NotFound);
        }
        Ok(())
    }

    /// The doctor's enabled recurring rules, joined with the slot catalog,
    /// ordered so slots come out ascending by start time within each weekday.
    async fn weekly_pattern(
        &self,
        doctor_id: i32,
    ) -> Result<Vec<AvailabilityPatternRow>, DoctorError> {
        let rows = sqlx::query_as::<_, AvailabilityPatternRow>(
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

        Ok(rows)
    }

    /// Slots already held by a non-cancelled appointment inside the window.
    /// Pending, confirmed and completed all block rebooking.
    async fn booked_slots(
        &self,
        doctor_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashSet<(NaiveDate, i32)>, DoctorError> {
        let rows = sqlx::query_as::<_, BookedSlotRow>(
            r#"
            SELECT appointment_date, time_slot_id
            FROM appointments
            WHERE doctor_id = $1
              AND appointment_date >= $2
              AND appointment_date <= $3
              AND status <> 'cancelled'
            "#,
        )
        .bind(doctor_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.appointment_date, row.time_slot_id))
            .collect())
    }
}

/// Pure assembly of the per-day slot grid: a finite, restartable sequence of
/// `DaySlots`, ascending by date, covering `[from, from + horizon_days]`
/// inclusive. Days whose weekday has no enabled rule get an empty slot list.
pub fn day_grid<'a>(
    from: NaiveDate,
    horizon_days: i64,
    pattern: &'a [AvailabilityPatternRow],
    booked: &'a HashSet<(NaiveDate, i32)>,
) -> impl Iterator<Item = DaySlots> + 'a {
    let mut by_weekday: HashMap<i16, Vec<&AvailabilityPatternRow>> = HashMap::new();
    for rule in pattern {
        by_weekday.entry(rule.day_of_week).or_default().push(rule);
    }

    (0..=horizon_days).map(move |offset| {
        let date = from + Duration::days(offset);
        let weekday = booking_day_of_week(date);

        let time_slots = by_weekday
            .get(&weekday)
            .map(|rules| {
                rules
                    .iter()
                    .map(|rule| SlotAvailability {
                        id: rule.time_slot_id,
                        start_time: format_display_time(rule.start_time),
                        end_time: format_display_time(rule.end_time),
                        is_available: !booked.contains(&(date, rule.time_slot_id)),
                    })
                    .collect()
            })
            .unwrap_or_default();

        DaySlots {
            date: date.format("%d").to_string(),
            day: date.format("%a").to_string(),
            month: date.format("%b").to_string(),
            full_date: date.format("%Y-%m-%d").to_string(),
            time_slots,
        }
    })
}
