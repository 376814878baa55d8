// libs/notification-cell/src/services/mailer.rs
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{EmailMessage, NotificationError};

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError>;
}

/// Outbound mail through the SendGrid v3 API.
pub struct SendGridMailer {
    client: Client,
    base_url: String,
    api_key: String,
    from_email: String,
}

impl SendGridMailer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.sendgrid_base_url.clone(),
            api_key: config.sendgrid_api_key.clone(),
            from_email: config.sendgrid_from_email.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for SendGridMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        if self.api_key.is_empty() || self.from_email.is_empty() {
            return Err(NotificationError::Send(
                "SendGrid is not configured".to_string(),
            ));
        }

        let url = format!("{}/v3/mail/send", self.base_url);
        debug!("Sending email to {} via {}", message.to, url);

        let payload = json!({
            "personalizations": [{
                "to": [{ "email": message.to }]
            }],
            "from": { "email": self.from_email },
            "subject": message.subject,
            "content": [{
                "type": "text/html",
                "value": message.html
            }]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::Send(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("SendGrid API error ({}): {}", status, body);
            return Err(NotificationError::Send(format!(
                "SendGrid returned {}",
                status
            )));
        }

        info!("Email sent successfully to {}", message.to);
        Ok(())
    }
}
