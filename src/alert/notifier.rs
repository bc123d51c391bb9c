// src/alert/notifier.rs
use super::AlertMessage;
use crate::check::Contact;
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("channel rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// The contact has no address for this channel.
    Skipped,
}

impl Delivery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delivery::Sent => "sent",
            Delivery::Skipped => "skipped",
        }
    }
}

/// A delivery channel (SMS, mail, ...).
#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &'static str;

    async fn notify(&self, contact: &Contact, message: &AlertMessage)
        -> Result<Delivery, NotifyError>;
}

/// Writes alerts to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn channel(&self) -> &'static str {
        "log"
    }

    async fn notify(
        &self,
        contact: &Contact,
        message: &AlertMessage,
    ) -> Result<Delivery, NotifyError> {
        info!(recipient = %contact.first_name, "{}", message.body);
        Ok(Delivery::Sent)
    }
}
