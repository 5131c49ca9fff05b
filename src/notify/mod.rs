pub mod mailer;
pub mod recording;

pub use mailer::HttpMailer;
pub use recording::RecordingNotifier;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Outbound messages the platform sends. The one_time_id is embedded in the
/// link the recipient follows to finish the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    SetPassword {
        email: String,
        first_name: String,
        one_time_id: Uuid,
    },
    ResetPassword {
        email: String,
        first_name: String,
        one_time_id: Uuid,
    },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::SetPassword { email, .. } => email,
            Notification::ResetPassword { email, .. } => email,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::SetPassword { .. } => "set_password",
            Notification::ResetPassword { .. } => "reset_password",
        }
    }
}

/// Message-delivery collaborator. Fire-and-forget from the caller's
/// perspective: no delivery confirmation is consumed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<()>;
}

/// Fallback notifier for deployments without mail credentials: logs the
/// notification and drops it.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        tracing::info!(
            recipient = notification.recipient(),
            kind = notification.kind(),
            "mail delivery disabled, dropping notification"
        );
        Ok(())
    }
}
