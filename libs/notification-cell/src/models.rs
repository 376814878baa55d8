// libs/notification-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outcome surfaced to the caller: the status change is never rolled back on
/// a failed send, the failure is only reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Sent,
    Failed,
}

#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub status: EmailStatus,
    pub error: Option<String>,
}

impl DispatchReport {
    pub fn sent() -> Self {
        Self {
            status: EmailStatus::Sent,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: EmailStatus::Failed,
            error: Some(reason.into()),
        }
    }
}

/// The joined appointment fields the status templates need. Built by the
/// caller from its own detail record so this cell stays domain-agnostic.
#[derive(Debug, Clone)]
pub struct AppointmentEmailContext {
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub doctor_name: String,
    pub specialty_name: Option<String>,
    pub appointment_date: NaiveDate,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub new_status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Patient email is missing")]
    MissingRecipient,

    #[error("Email delivery failed: {0}")]
    Send(String),
}
