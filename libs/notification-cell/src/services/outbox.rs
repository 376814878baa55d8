// libs/notification-cell/src/services/outbox.rs
use std::sync::Arc;

use tracing::{info, warn};

use shared_config::AppConfig;

use crate::models::{AppointmentEmailContext, DispatchReport};
use crate::services::mailer::{EmailSender, SendGridMailer};
use crate::services::templates;

/// Post-commit notification task runner. The caller enqueues a task only
/// after its transaction has committed; a failed send is logged and reported,
/// never propagated, so delivery problems cannot undo a state change.
pub struct NotificationOutbox {
    mailer: Arc<dyn EmailSender>,
}

impl NotificationOutbox {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            mailer: Arc::new(SendGridMailer::new(config)),
        }
    }

    /// Swap in another sender (tests).
    pub fn with_sender(mailer: Arc<dyn EmailSender>) -> Self {
        Self { mailer }
    }

    pub async fn dispatch_status_change(&self, ctx: &AppointmentEmailContext) -> DispatchReport {
        let message = match templates::appointment_status_email(ctx) {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping status notification: {}", e);
                return DispatchReport::failed(e.to_string());
            }
        };

        match self.mailer.send(&message).await {
            Ok(()) => {
                info!(
                    "Status notification ({}) sent to {}",
                    ctx.new_status, message.to
                );
                DispatchReport::sent()
            }
            Err(e) => {
                warn!(
                    "Status notification ({}) to {} failed: {}",
                    ctx.new_status, message.to, e
                );
                DispatchReport::failed(e.to_string())
            }
        }
    }
}
