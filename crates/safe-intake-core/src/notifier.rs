// SPDX-License-Identifier: Apache-2.0

//! Outbound notification, recorded as a log entry.
//!
//! Nothing here spawns a process or shell. Fields are logged with `Debug`
//! formatting so control characters are escaped rather than written raw.

use tracing::info;

use crate::config::NotifyConfig;

/// An email-shaped notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

impl Notification {
    /// Builds a notification addressed per `config` with the given body.
    #[must_use]
    pub fn from_config(config: &NotifyConfig, body: impl Into<String>) -> Self {
        Self {
            recipient: config.recipient.clone(),
            subject: config.subject.clone(),
            body: body.into(),
        }
    }
}

/// Delivers notifications. Must not fail the caller.
pub trait Notifier: Send + Sync {
    /// Sends one notification.
    fn notify(&self, notification: &Notification);
}

/// Notifier that only writes an informational log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        info!(
            recipient = ?notification.recipient,
            subject = ?notification.subject,
            body = ?notification.body,
            "Email notification (logged)"
        );
    }
}
