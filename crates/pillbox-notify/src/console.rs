use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::{
    error::Result,
    notifier::{DeliveryId, Notifier},
};

/// Dry-run transport: logs every message and hands back a local sequence id.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    sent: AtomicU64,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages "sent" so far.
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, destination: &str, body: &str) -> Result<DeliveryId> {
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        info!(recipient = %destination, seq = n, "dry run, message not sent:\n{body}");
        Ok(DeliveryId(format!("console-{n}")))
    }
}
