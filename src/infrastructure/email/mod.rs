use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::config_model::Email;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
#[automock]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Stand-in transport that writes outbound mail to the log. The queue in
/// front of it stays the same when a real provider is plugged in.
pub struct LogEmailSender {
    from_address: String,
}

impl LogEmailSender {
    pub fn new(from_address: String) -> Self {
        Self { from_address }
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            from = %self.from_address,
            to = %message.to,
            subject = %message.subject,
            "Sending email"
        );
        Ok(())
    }
}

/// Fire-and-forget outbox. Requests enqueue and return immediately; a
/// background task drains the channel so a slow provider never blocks a
/// request handler.
#[derive(Clone)]
pub struct EmailQueue {
    tx: mpsc::Sender<EmailMessage>,
}

impl EmailQueue {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        let (tx, mut rx) = mpsc::channel::<EmailMessage>(256);

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let Err(error) = sender.send(&message).await {
                    warn!(
                        to = %message.to,
                        error = %error,
                        "Email delivery failed"
                    );
                }
            }
        });

        Self { tx }
    }

    pub fn try_enqueue(&self, message: EmailMessage) {
        match self.tx.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Email queue full; dropping message");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Email queue closed; dropping message");
            }
        }
    }
}

pub fn verification_email(config: &Email, to: &str, first_name: &str, token: &str) -> EmailMessage {
    let link = format!("{}/verify-email?token={}", config.public_base_url, token);
    EmailMessage {
        to: to.to_string(),
        subject: "Verify your email address".to_string(),
        body: format!(
            "Hi {},\n\nWelcome aboard. Please confirm your email address by opening the link below:\n\n{}\n\nThe link expires in 24 hours. If you did not create an account, you can ignore this message.\n",
            first_name, link
        ),
    }
}

pub fn password_reset_email(
    config: &Email,
    to: &str,
    first_name: &str,
    token: &str,
) -> EmailMessage {
    let link = format!("{}/reset-password?token={}", config.public_base_url, token);
    EmailMessage {
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        body: format!(
            "Hi {},\n\nA password reset was requested for your account. Open the link below to choose a new password:\n\n{}\n\nThe link expires in 24 hours. If you did not request this, you can ignore this message.\n",
            first_name, link
        ),
    }
}

pub fn booking_received_email(to: &str, customer_name: &str, booking_number: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Booking {} received", booking_number),
        body: format!(
            "Hi {},\n\nWe have received your booking {}. It is pending confirmation and we will let you know as soon as it is confirmed.\n",
            customer_name, booking_number
        ),
    }
}

pub fn booking_status_email(
    to: &str,
    customer_name: &str,
    booking_number: &str,
    status_line: &str,
) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: format!("Booking {} {}", booking_number, status_line),
        body: format!(
            "Hi {},\n\nYour booking {} has been {}.\n",
            customer_name, booking_number, status_line
        ),
    }
}
