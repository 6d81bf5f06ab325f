use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use pillbox_core::config::ReminderConfig;
use pillbox_notify::Notifier;
use pillbox_store::MedicineStore;
use tracing::{debug, info, warn};

use crate::{digest::render_digest, error::Result, trigger::TriggerTimes};

/// What a single reminder run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The current minute is not a trigger time. The store was not touched.
    NotDue,
    /// Trigger matched but there are no active medicines.
    NothingToSend,
    /// The digest went out; one attempt per recipient.
    Dispatched { delivered: usize, failed: usize },
}

/// Decides whether "now" is a reminder moment and, if so, sends the digest.
///
/// Holds only read-only configuration; every run re-reads the store.
pub struct ReminderJob {
    store: Arc<dyn MedicineStore>,
    notifier: Arc<dyn Notifier>,
    triggers: TriggerTimes,
    recipients: Vec<String>,
}

impl ReminderJob {
    pub fn new(
        store: Arc<dyn MedicineStore>,
        notifier: Arc<dyn Notifier>,
        config: &ReminderConfig,
    ) -> Self {
        if config.recipients.is_empty() {
            warn!("no reminder recipients configured; digests will not be sent");
        }
        Self {
            store,
            notifier,
            triggers: TriggerTimes::new(config.trigger_times.clone()),
            recipients: config.recipients.clone(),
        }
    }

    pub fn triggers(&self) -> &TriggerTimes {
        &self.triggers
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Run against the local wall clock.
    pub async fn run(&self) -> Result<TickOutcome> {
        self.run_at(Local::now().naive_local()).await
    }

    /// Run as if the local time were `now`.
    ///
    /// A store failure is returned as-is. Delivery failures are logged and
    /// counted, never returned.
    pub async fn run_at(&self, now: NaiveDateTime) -> Result<TickOutcome> {
        let Some(trigger) = self.triggers.matching(now) else {
            debug!(time = %now.format("%H:%M"), "not a trigger time");
            return Ok(TickOutcome::NotDue);
        };

        let records = self.store.list_active().await?;
        if records.is_empty() {
            info!(%trigger, "trigger matched but no active medicines");
            return Ok(TickOutcome::NothingToSend);
        }

        let digest = render_digest(now, trigger, &records);
        info!(
            %trigger,
            medicines = records.len(),
            recipients = self.recipients.len(),
            transport = self.notifier.name(),
            "sending reminder digest"
        );

        let mut delivered = 0;
        let mut failed = 0;
        for recipient in &self.recipients {
            match self.notifier.send(recipient, &digest).await {
                Ok(sid) => {
                    delivered += 1;
                    info!(%recipient, %sid, "reminder delivered");
                }
                Err(e) => {
                    failed += 1;
                    warn!(%recipient, error = %e, "reminder delivery failed");
                }
            }
        }

        Ok(TickOutcome::Dispatched { delivered, failed })
    }
}
