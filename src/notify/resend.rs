//! # Notifier vía Resend
//! src/notify/resend.rs
//!
//! `POST https://api.resend.com/emails` con bearer token y body JSON
//! `{from, to, subject, html}`.

use super::{Notification, Notifier, NotifyError};
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;

pub const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

pub struct ResendNotifier {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
    to: String,
}

impl ResendNotifier {
    pub fn new(api_key: String, from: String, to: String) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: RESEND_ENDPOINT.to_string(),
            api_key,
            from,
            to,
        })
    }

    /// Cambia el endpoint (tests contra un servidor local)
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

impl Notifier for ResendNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::debug!(to = %self.to, "sending email via Resend");

        let payload = EmailPayload {
            from: &self.from,
            to: &self.to,
            subject: &notification.subject,
            html: &notification.html,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %self.to, "email sent");
        Ok(())
    }
}
