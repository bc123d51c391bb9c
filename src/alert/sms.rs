// src/alert/sms.rs
use super::{AlertMessage, Delivery, Notifier, NotifyError};
use crate::check::Contact;
use crate::config::SmsConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Sends alerts through a Twilio-compatible messages API.
pub struct SmsNotifier {
    config: SmsConfig,
    client: Client,
}

impl SmsNotifier {
    pub fn new(config: SmsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create SMS client")?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

pub(crate) fn normalize_phone(phone: &str, default_country_code: &str) -> String {
    let phone = phone.trim();
    if phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("{}{}", default_country_code, phone)
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn channel(&self) -> &'static str {
        "sms"
    }

    async fn notify(
        &self,
        contact: &Contact,
        message: &AlertMessage,
    ) -> Result<Delivery, NotifyError> {
        let Some(phone) = contact.phone.as_deref().filter(|p| !p.trim().is_empty()) else {
            debug!("No phone number for {}, skipping SMS", contact.first_name);
            return Ok(Delivery::Skipped);
        };

        let to = normalize_phone(phone, &self.config.default_country_code);
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to.as_str()),
                ("From", self.config.from_phone.as_str()),
                ("Body", message.body.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("SMS sent to {}", to);
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config(api_base: String) -> SmsConfig {
        SmsConfig {
            api_base,
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from_phone: "+15550000".to_string(),
            default_country_code: "+91".to_string(),
            timeout_secs: 5,
        }
    }

    fn message() -> AlertMessage {
        AlertMessage {
            subject: "s".to_string(),
            body: "Alert : Your check for GET http://a.test/ is currently down".to_string(),
        }
    }

    fn contact(phone: Option<&str>) -> Contact {
        Contact {
            first_name: "Ravi".to_string(),
            email: None,
            phone: phone.map(str::to_string),
        }
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("9876543210", "+91"), "+919876543210");
        assert_eq!(normalize_phone(" +14155550100 ", "+91"), "+14155550100");
    }

    #[tokio::test]
    async fn test_posts_form_with_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/2010-04-01/Accounts/AC123/Messages.json")
            .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("To".to_string(), "+919876543210".to_string()),
                Matcher::UrlEncoded("From".to_string(), "+15550000".to_string()),
            ]))
            .with_status(201)
            .with_body(r#"{"sid":"SM1"}"#)
            .create_async()
            .await;

        let notifier = SmsNotifier::new(config(server.url())).unwrap();
        let delivery = notifier
            .notify(&contact(Some("9876543210")), &message())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(delivery, Delivery::Sent);
    }

    #[tokio::test]
    async fn test_rejection_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(400)
            .with_body("bad number")
            .create_async()
            .await;

        let notifier = SmsNotifier::new(config(server.url())).unwrap();
        let err = notifier
            .notify(&contact(Some("1")), &message())
            .await
            .unwrap_err();

        assert!(matches!(err, NotifyError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_contact_without_phone_is_skipped() {
        let notifier = SmsNotifier::new(config("http://127.0.0.1:9".to_string())).unwrap();
        let delivery = notifier.notify(&contact(None), &message()).await.unwrap();
        assert_eq!(delivery, Delivery::Skipped);
    }
}
