//! Notification collaborator: tells the candidate how the screening went.

use async_trait::async_trait;
use serde::Serialize;

pub mod email;
pub mod smtp;

pub use smtp::SmtpNotifier;

/// What the pipeline hands the notifier. `address` may be missing; the
/// notifier then reports failure instead of erroring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub address: Option<String>,
    pub candidate_name: Option<String>,
    pub job_title: String,
    pub score: f64,
    pub feedback: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns whether the message was handed to the mail server.
    async fn notify(&self, notification: &Notification) -> bool;
}
