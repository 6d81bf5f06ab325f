use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::job::{ReminderJob, TickOutcome};

/// Drives the reminder job: sleep for the poll interval, run once, repeat.
///
/// Runs are strictly sequential; a slow store or transport delays the next
/// sleep rather than overlapping with it.
pub struct SchedulerLoop {
    job: ReminderJob,
    poll_interval: Duration,
}

impl SchedulerLoop {
    pub fn new(job: ReminderJob, poll_interval: Duration) -> Self {
        Self { job, poll_interval }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Main loop. Returns once `shutdown` broadcasts `true` or its sender is
    /// dropped; a run already in progress is finished first.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            poll_secs = self.poll_interval.as_secs(),
            triggers = ?self.job.triggers().as_slice(),
            recipients = self.job.recipients().len(),
            "reminder scheduler started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {
                    match self.job.run().await {
                        Ok(TickOutcome::NotDue) => {}
                        Ok(outcome) => debug!(?outcome, "reminder run finished"),
                        // Store unavailable: skip this run, try again next poll.
                        Err(e) => error!("reminder run failed: {e}"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("reminder scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }
}
