// Hand-written store and transport doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use pillbox_core::config::ReminderConfig;
use pillbox_core::{MedicineRecord, NewMedicine};
use pillbox_notify::{DeliveryId, Notifier, NotifyError};
use pillbox_store::{MedicineStore, StoreError};

/// Serves a fixed record list and counts how often it was asked.
#[derive(Default)]
pub struct FakeStore {
    records: Vec<MedicineRecord>,
    fail_reads: bool,
    list_calls: AtomicUsize,
}

impl FakeStore {
    pub fn with(records: Vec<MedicineRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Default::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MedicineStore for FakeStore {
    fn name(&self) -> &str {
        "fake"
    }

    async fn insert(&self, _medicine: &NewMedicine) -> pillbox_store::Result<MedicineRecord> {
        unimplemented!("read-only fake")
    }

    async fn get(&self, id: i64) -> pillbox_store::Result<Option<MedicineRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    async fn list_active(&self) -> pillbox_store::Result<Vec<MedicineRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(StoreError::Remote {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(self.records.iter().filter(|r| !r.deleted).cloned().collect())
    }

    async fn update(&self, _id: i64, _medicine: &NewMedicine) -> pillbox_store::Result<()> {
        unimplemented!("read-only fake")
    }

    async fn soft_delete(&self, _id: i64) -> pillbox_store::Result<()> {
        unimplemented!("read-only fake")
    }

    async fn hard_delete(&self, _id: i64) -> pillbox_store::Result<()> {
        unimplemented!("read-only fake")
    }
}

/// Records every send attempt; destinations in `reject` fail.
#[derive(Default)]
pub struct RecordingNotifier {
    reject: HashSet<String>,
    attempts: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn rejecting(destinations: &[&str]) -> Self {
        Self {
            reject: destinations.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Every (destination, body) pair, in call order, failed or not.
    pub fn attempts(&self) -> Vec<(String, String)> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, destination: &str, body: &str) -> pillbox_notify::Result<DeliveryId> {
        let n = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push((destination.to_string(), body.to_string()));
            attempts.len()
        };
        if self.reject.contains(destination) {
            return Err(NotifyError::Api {
                status: 400,
                code: Some(21211),
                message: "invalid 'To' number".to_string(),
            });
        }
        Ok(DeliveryId(format!("SM{n:04}")))
    }
}

pub fn paracetamol() -> MedicineRecord {
    MedicineRecord {
        id: 1,
        name: "Paracetamol".to_string(),
        quantity: "500mg".to_string(),
        frequency: "every 8h".to_string(),
        phone: String::new(),
        start_date: "2024-01-01".to_string(),
        end_date: "2024-01-10".to_string(),
        deleted: false,
    }
}

pub fn config(recipients: &[&str], triggers: &[&str]) -> ReminderConfig {
    ReminderConfig {
        recipients: recipients.iter().map(|r| r.to_string()).collect(),
        trigger_times: triggers.iter().map(|t| t.to_string()).collect(),
        poll_interval_secs: 60,
    }
}

/// Every minute of the day, so any wall-clock reading is a trigger.
pub fn every_minute() -> Vec<String> {
    (0..24)
        .flat_map(|h| (0..60).map(move |m| format!("{h:02}:{m:02}")))
        .collect()
}
