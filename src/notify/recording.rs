use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use super::{Notification, Notifier};

/// Notifier that records every message instead of delivering it. Tests
/// assert on what was (and was not) sent, and pull one-time ids out of the
/// recorded notifications.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: Notification) -> Result<()> {
        self.sent.lock().expect("lock poisoned").push(notification);
        Ok(())
    }
}
