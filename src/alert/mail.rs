// src/alert/mail.rs
use super::{AlertMessage, Delivery, Notifier, NotifyError};
use crate::check::Contact;
use crate::config::MailConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    to_name: &'a str,
    subject: String,
    text: &'a str,
}

/// Hands alerts to an HTTP mail relay as JSON.
pub struct MailNotifier {
    config: MailConfig,
    client: Client,
}

impl MailNotifier {
    pub fn new(config: MailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create mail client")?;
        Ok(Self { config, client })
    }

    fn subject(&self, message: &AlertMessage) -> String {
        match &self.config.subject_prefix {
            Some(prefix) => format!("{} - {}", prefix, message.subject),
            None => message.subject.clone(),
        }
    }
}

#[async_trait]
impl Notifier for MailNotifier {
    fn channel(&self) -> &'static str {
        "mail"
    }

    async fn notify(
        &self,
        contact: &Contact,
        message: &AlertMessage,
    ) -> Result<Delivery, NotifyError> {
        let Some(email) = contact.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            debug!("No email address for {}, skipping mail", contact.first_name);
            return Ok(Delivery::Skipped);
        };

        let payload = MailRequest {
            from: &self.config.from,
            to: email,
            to_name: &contact.first_name,
            subject: self.subject(message),
            text: &message.body,
        };

        let mut request = self.client.post(self.config.endpoint.clone()).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Mail sent to {}", email);
        Ok(Delivery::Sent)
    }
}
