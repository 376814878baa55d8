pub mod mailer;
pub mod outbox;
pub mod templates;

pub use mailer::{EmailSender, SendGridMailer};
pub use outbox::NotificationOutbox;
