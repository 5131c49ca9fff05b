use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{Notification, Notifier};

/// Mail delivery over an HTTP mail API.
#[derive(Clone)]
pub struct HttpMailer {
    http_client: Client,
    api_url: String,
    api_token: String,
    from_address: String,
    setup_link_base: String,
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    template: &'a str,
    first_name: &'a str,
    link: String,
}

impl HttpMailer {
    pub fn new(
        api_url: String,
        api_token: String,
        from_address: String,
        setup_link_base: String,
    ) -> Self {
        Self {
            http_client: Client::new(),
            api_url,
            api_token,
            from_address,
            setup_link_base,
        }
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, notification: Notification) -> Result<()> {
        let (to, first_name, path, one_time_id) = match &notification {
            Notification::SetPassword {
                email,
                first_name,
                one_time_id,
            } => (email, first_name, "set-password", one_time_id),
            Notification::ResetPassword {
                email,
                first_name,
                one_time_id,
            } => (email, first_name, "reset-password", one_time_id),
        };

        let request_body = MailRequest {
            from: &self.from_address,
            to,
            template: notification.kind(),
            first_name,
            link: format!("{}/{}/{}", self.setup_link_base, path, one_time_id),
        };

        let response = self
            .http_client
            .post(format!("{}/messages", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&request_body)
            .send()
            .await
            .context("Failed to call mail delivery API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Mail delivery API failed with status {}: {}", status, error_text);
        }

        tracing::info!(
            recipient = request_body.to,
            template = request_body.template,
            "notification dispatched"
        );

        Ok(())
    }
}
