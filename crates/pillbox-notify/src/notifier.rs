use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque provider-assigned id for one accepted message (Twilio's `SM…` sid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(pub String);

impl std::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Common interface implemented by every outbound transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Stable lowercase identifier for log lines (e.g. `"twilio"`).
    fn name(&self) -> &str;

    /// Deliver `body` to `destination` (an E.164 phone number).
    async fn send(&self, destination: &str, body: &str) -> Result<DeliveryId>;
}
