use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::models::{
    AppointmentEmailContext, EmailMessage, EmailStatus, NotificationError,
};
use notification_cell::services::mailer::{EmailSender, SendGridMailer};
use notification_cell::services::outbox::NotificationOutbox;
use shared_config::AppConfig;

fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        database_url: String::new(),
        jwt_secret: "test-secret".to_string(),
        sendgrid_api_key: "sg-test-key".to_string(),
        sendgrid_from_email: "noreply@medcare.test".to_string(),
        sendgrid_base_url: base_url.to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        port: 0,
    }
}

fn context() -> AppointmentEmailContext {
    AppointmentEmailContext {
        patient_name: "Jane Doe".to_string(),
        patient_email: Some("jane@example.com".to_string()),
        doctor_name: "John Smith".to_string(),
        specialty_name: Some("Cardiology".to_string()),
        appointment_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        start_time: Some("9:00 AM".to_string()),
        end_time: Some("9:30 AM".to_string()),
        new_status: "confirmed".to_string(),
    }
}

#[tokio::test]
async fn mailer_posts_sendgrid_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("Authorization", "Bearer sg-test-key"))
        .and(body_partial_json(serde_json::json!({
            "from": { "email": "noreply@medcare.test" },
            "subject": "Appointment Confirmed"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mailer = SendGridMailer::new(&test_config(&mock_server.uri()));
    let message = EmailMessage {
        to: "jane@example.com".to_string(),
        subject: "Appointment Confirmed".to_string(),
        html: "<p>hi</p>".to_string(),
    };

    mailer.send(&message).await.unwrap();

    // Recipient lands in personalizations
    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(
        body["personalizations"][0]["to"][0]["email"],
        "jane@example.com"
    );
}

#[tokio::test]
async fn mailer_surfaces_api_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mailer = SendGridMailer::new(&test_config(&mock_server.uri()));
    let message = EmailMessage {
        to: "jane@example.com".to_string(),
        subject: "subject".to_string(),
        html: "<p>hi</p>".to_string(),
    };

    assert!(matches!(
        mailer.send(&message).await,
        Err(NotificationError::Send(_))
    ));
}

#[tokio::test]
async fn unconfigured_mailer_fails_without_network() {
    let mut config = test_config("http://localhost:1");
    config.sendgrid_api_key = String::new();

    let mailer = SendGridMailer::new(&config);
    let message = EmailMessage {
        to: "jane@example.com".to_string(),
        subject: "subject".to_string(),
        html: "<p>hi</p>".to_string(),
    };

    assert!(matches!(
        mailer.send(&message).await,
        Err(NotificationError::Send(_))
    ));
}

struct FailingSender;

#[async_trait]
impl EmailSender for FailingSender {
    async fn send(&self, _message: &EmailMessage) -> Result<(), NotificationError> {
        Err(NotificationError::Send("boom".to_string()))
    }
}

struct RecordingSender {
    sent: std::sync::Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[tokio::test]
async fn outbox_reports_failure_without_propagating() {
    let outbox = NotificationOutbox::with_sender(Arc::new(FailingSender));

    let report = outbox.dispatch_status_change(&context()).await;

    assert_eq!(report.status, EmailStatus::Failed);
    assert!(report.error.as_deref().unwrap().contains("boom"));
}

#[tokio::test]
async fn outbox_reports_missing_recipient_as_failure() {
    let outbox = NotificationOutbox::with_sender(Arc::new(FailingSender));
    let mut ctx = context();
    ctx.patient_email = None;

    let report = outbox.dispatch_status_change(&ctx).await;

    assert_eq!(report.status, EmailStatus::Failed);
    assert_eq!(report.error.as_deref(), Some("Patient email is missing"));
}

#[tokio::test]
async fn outbox_sends_rendered_template() {
    let sender = Arc::new(RecordingSender {
        sent: std::sync::Mutex::new(Vec::new()),
    });
    let outbox = NotificationOutbox::with_sender(sender.clone());

    let report = outbox.dispatch_status_change(&context()).await;

    assert_eq!(report.status, EmailStatus::Sent);
    let sent = sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jane@example.com");
    assert_eq!(sent[0].subject, "Appointment Confirmed");
}
