//! Contact-form mail delivery.
//!
//! Submissions are relayed to the Resend HTTP API. The mailer is built once at
//! startup: with an API key it holds a `reqwest` client, without one it is the
//! `Disabled` variant and the contact endpoint answers 503. A `Log` variant
//! exists for local dev so the form can be exercised without credentials.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::time::Duration;
use tracing::info;

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// A validated contact-form submission ready for delivery.
#[derive(Clone, Debug)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub enquiry_type: Option<String>,
    pub message: String,
}

impl ContactMessage {
    fn subject(&self) -> String {
        match self.enquiry_type.as_deref() {
            Some(enquiry) if !enquiry.is_empty() => {
                format!("[{enquiry}] Website enquiry from {}", self.name)
            }
            _ => format!("Website enquiry from {}", self.name),
        }
    }

    fn body_text(&self) -> String {
        let mut body = format!("Name: {}\nEmail: {}\n", self.name, self.email);
        if let Some(company) = self.company.as_deref() {
            body.push_str(&format!("Company: {company}\n"));
        }
        if let Some(enquiry) = self.enquiry_type.as_deref() {
            body.push_str(&format!("Enquiry type: {enquiry}\n"));
        }
        body.push('\n');
        body.push_str(&self.message);
        body
    }
}

enum MailerSource {
    /// No API key configured; the contact endpoint is disabled.
    Disabled,
    /// Local dev delivery that logs the payload and reports success.
    Log,
    /// Resend HTTP API delivery.
    Resend {
        api_key: SecretString,
        client: Client,
    },
}

/// Outbound mail client for the contact form.
pub struct ContactMailer {
    source: MailerSource,
    from: String,
    to: String,
}

impl ContactMailer {
    /// Mailer without a delivery backend. `send` is unreachable because the
    /// handler checks `is_configured` first.
    #[must_use]
    pub fn disabled(from: String, to: String) -> Self {
        Self {
            source: MailerSource::Disabled,
            from,
            to,
        }
    }

    /// Local dev mailer that logs instead of sending.
    #[must_use]
    pub fn log(from: String, to: String) -> Self {
        Self {
            source: MailerSource::Log,
            from,
            to,
        }
    }

    /// Build a Resend-backed mailer. The HTTP client is only constructed here,
    /// after the key is known to exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn resend(api_key: SecretString, from: String, to: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(SEND_TIMEOUT)
            .build()
            .context("Failed to build Resend HTTP client")?;

        Ok(Self {
            source: MailerSource::Resend { api_key, client },
            from,
            to,
        })
    }

    /// Whether the contact endpoint has a delivery backend.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !matches!(self.source, MailerSource::Disabled)
    }

    /// Deliver one contact message.
    ///
    /// # Errors
    ///
    /// Returns an error when the mailer is disabled or the Resend API rejects
    /// the request.
    pub async fn send(&self, message: &ContactMessage) -> Result<()> {
        match &self.source {
            MailerSource::Disabled => Err(anyhow!("contact mailer is not configured")),
            MailerSource::Log => {
                info!(
                    from = %message.email,
                    subject = %message.subject(),
                    "contact mail send stub"
                );
                Ok(())
            }
            MailerSource::Resend { api_key, client } => {
                let payload = json!({
                    "from": self.from,
                    "to": [self.to],
                    "reply_to": message.email,
                    "subject": message.subject(),
                    "text": message.body_text(),
                });

                let response = client
                    .post(RESEND_API_URL)
                    .bearer_auth(api_key.expose_secret())
                    .json(&payload)
                    .send()
                    .await
                    .context("Failed to reach the Resend API")?;

                let status = response.status();
                if status.is_success() {
                    Ok(())
                } else {
                    let body = response.text().await.unwrap_or_default();
                    Err(anyhow!("Resend API error: HTTP {status}: {body}"))
                }
            }
        }
    }
}
