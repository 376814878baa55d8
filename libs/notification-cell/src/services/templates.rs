// libs/notification-cell/src/services/templates.rs
use crate::models::{AppointmentEmailContext, EmailMessage, NotificationError};

fn appointment_details_block(ctx: &AppointmentEmailContext) -> String {
    let formatted_date = ctx.appointment_date.format("%-d %B %Y").to_string();
    let formatted_time = match (&ctx.start_time, &ctx.end_time) {
        (Some(start), Some(end)) => format!("{} - {}", start, end),
        _ => "To be confirmed".to_string(),
    };
    let specialty = ctx.specialty_name.as_deref().unwrap_or("General");

    format!(
        "<p><strong>Appointment Details:</strong></p>\
         <ul>\
         <li>Date: {}</li>\
         <li>Time: {}</li>\
         <li>Doctor: Dr. {}</li>\
         <li>Specialty: {}</li>\
         </ul>",
        formatted_date, formatted_time, ctx.doctor_name, specialty
    )
}

/// Render the status-change email for an appointment. Unknown statuses get a
/// generic update template rather than an error.
pub fn appointment_status_email(
    ctx: &AppointmentEmailContext,
) -> Result<EmailMessage, NotificationError> {
    let to = ctx
        .patient_email
        .clone()
        .ok_or(NotificationError::MissingRecipient)?;

    let specialty = ctx.specialty_name.as_deref().unwrap_or("General");
    let details = appointment_details_block(ctx);

    let (subject, body) = match ctx.new_status.as_str() {
        "pending" => (
            "Appointment Booking Confirmation - Pending".to_string(),
            format!(
                "<h2>Appointment Booking Confirmation</h2>\
                 <p>Dear {},</p>\
                 <p>Your appointment with Dr. {} ({}) has been booked and is pending confirmation.</p>\
                 {}\
                 <p>We will notify you once the appointment is confirmed.</p>",
                ctx.patient_name, ctx.doctor_name, specialty, details
            ),
        ),
        "confirmed" => (
            "Appointment Confirmed".to_string(),
            format!(
                "<h2>Appointment Confirmed</h2>\
                 <p>Dear {},</p>\
                 <p>Your appointment with Dr. {} ({}) has been confirmed.</p>\
                 {}\
                 <p>Please arrive 15 minutes before your scheduled appointment time.</p>",
                ctx.patient_name, ctx.doctor_name, specialty, details
            ),
        ),
        "completed" => (
            "Appointment Completed - Share Your Experience".to_string(),
            format!(
                "<h2>Appointment Completed</h2>\
                 <p>Dear {},</p>\
                 <p>Your appointment with Dr. {} ({}) has been marked as completed.</p>\
                 {}\
                 <p>We value your feedback! Please take a moment to rate your experience with Dr. {}.</p>\
                 <p>You can leave a review by visiting the doctor's profile page.</p>",
                ctx.patient_name, ctx.doctor_name, specialty, details, ctx.doctor_name
            ),
        ),
        "cancelled" => (
            "Appointment Cancelled".to_string(),
            format!(
                "<h2>Appointment Cancelled</h2>\
                 <p>Dear {},</p>\
                 <p>Your appointment with Dr. {} ({}) has been cancelled.</p>\
                 {}\
                 <p>If you would like to reschedule, please visit our website to book a new appointment.</p>",
                ctx.patient_name, ctx.doctor_name, specialty, details
            ),
        ),
        other => (
            "Appointment Status Update".to_string(),
            format!(
                "<h2>Appointment Status Update</h2>\
                 <p>Dear {},</p>\
                 <p>The status of your appointment with Dr. {} has been updated to {}.</p>\
                 {}",
                ctx.patient_name, ctx.doctor_name, other, details
            ),
        ),
    };

    Ok(EmailMessage {
        to,
        subject,
        html: body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn context(status: &str) -> AppointmentEmailContext {
        AppointmentEmailContext {
            patient_name: "Jane Doe".to_string(),
            patient_email: Some("jane@example.com".to_string()),
            doctor_name: "John Smith".to_string(),
            specialty_name: Some("Cardiology".to_string()),
            appointment_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            start_time: Some("9:00 AM".to_string()),
            end_time: Some("9:30 AM".to_string()),
            new_status: status.to_string(),
        }
    }

    #[test]
    fn confirmed_template_has_expected_subject_and_body() {
        let message = appointment_status_email(&context("confirmed")).unwrap();
        assert_eq!(message.to, "jane@example.com");
        assert_eq!(message.subject, "Appointment Confirmed");
        assert!(message.html.contains("Dear Jane Doe"));
        assert!(message.html.contains("Dr. John Smith"));
        assert!(message.html.contains("Cardiology"));
        assert!(message.html.contains("9:00 AM - 9:30 AM"));
    }

    #[test]
    fn completed_template_asks_for_a_review() {
        let message = appointment_status_email(&context("completed")).unwrap();
        assert_eq!(message.subject, "Appointment Completed - Share Your Experience");
        assert!(message.html.contains("leave a review"));
    }

    #[test]
    fn cancelled_template_offers_rebooking() {
        let message = appointment_status_email(&context("cancelled")).unwrap();
        assert_eq!(message.subject, "Appointment Cancelled");
        assert!(message.html.contains("reschedule"));
    }

    #[test]
    fn unknown_status_falls_back_to_generic_update() {
        let message = appointment_status_email(&context("archived")).unwrap();
        assert_eq!(message.subject, "Appointment Status Update");
        assert!(message.html.contains("updated to archived"));
    }

    #[test]
    fn missing_recipient_is_an_error() {
        let mut ctx = context("confirmed");
        ctx.patient_email = None;
        assert!(matches!(
            appointment_status_email(&ctx),
            Err(NotificationError::MissingRecipient)
        ));
    }

    #[test]
    fn missing_slot_times_render_placeholder() {
        let mut ctx = context("pending");
        ctx.start_time = None;
        ctx.end_time = None;
        let message = appointment_status_email(&ctx).unwrap();
        assert!(message.html.contains("To be confirmed"));
    }
}
