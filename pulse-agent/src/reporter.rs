//! Best-effort snapshot delivery.
//!
//! One HTTP POST per snapshot, fire-and-forget: the outcome feeds the log
//! and nothing else. Failed snapshots are dropped, never queued or retried.

use reqwest::Url;
use tracing::{error, info};

use pulse_common::Snapshot;

/// Result of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The server answered with a 2xx status.
    Delivered(u16),
    /// The server answered with a non-2xx status.
    Rejected(u16),
    /// The request never completed (connection refused, timeout, ...).
    Failed(String),
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryOutcome::Delivered(status) => write!(f, "delivered ({})", status),
            DeliveryOutcome::Rejected(status) => write!(f, "rejected ({})", status),
            DeliveryOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Sends snapshots to a fixed HTTP endpoint.
#[derive(Clone)]
pub struct Reporter {
    client: reqwest::Client,
    endpoint: Url,
}

impl Reporter {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Attempt one delivery. Consumes only the status code of the response.
    pub async fn send(&self, snapshot: &Snapshot) -> DeliveryOutcome {
        match self
            .client
            .post(self.endpoint.clone())
            .json(snapshot)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    DeliveryOutcome::Delivered(status.as_u16())
                } else {
                    DeliveryOutcome::Rejected(status.as_u16())
                }
            }
            Err(e) => DeliveryOutcome::Failed(e.to_string()),
        }
    }

    /// Fire-and-forget delivery on a detached task.
    ///
    /// The caller never observes the outcome; it is logged and discarded,
    /// so the sampling loop is never blocked on delivery latency.
    pub fn dispatch(&self, snapshot: Snapshot) {
        let reporter = self.clone();
        tokio::spawn(async move {
            match reporter.send(&snapshot).await {
                DeliveryOutcome::Delivered(status) => {
                    info!(status, "snapshot delivered");
                }
                DeliveryOutcome::Rejected(status) => {
                    error!(status, "server rejected snapshot");
                }
                DeliveryOutcome::Failed(reason) => {
                    error!(%reason, "failed to deliver snapshot");
                }
            }
        });
    }
}
