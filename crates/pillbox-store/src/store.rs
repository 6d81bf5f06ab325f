use async_trait::async_trait;
use pillbox_core::{MedicineRecord, NewMedicine};

use crate::error::Result;

/// Common interface implemented by every record store backend.
///
/// Implementations must be `Send + Sync` so one store can be shared between
/// the operator commands and the scheduler loop.
#[async_trait]
pub trait MedicineStore: Send + Sync {
    /// Stable lowercase identifier for log lines (e.g. `"sqlite"`).
    fn name(&self) -> &str;

    /// Validate and insert a new record; returns it with its assigned id.
    async fn insert(&self, medicine: &NewMedicine) -> Result<MedicineRecord>;

    /// Fetch one record by id, soft-deleted or not.
    async fn get(&self, id: i64) -> Result<Option<MedicineRecord>>;

    /// All records not soft-deleted, in insertion order.
    async fn list_active(&self) -> Result<Vec<MedicineRecord>>;

    /// Replace every editable field. The soft-delete flag is left alone.
    async fn update(&self, id: i64, medicine: &NewMedicine) -> Result<()>;

    /// Hide a record from `list_active` while keeping it stored.
    async fn soft_delete(&self, id: i64) -> Result<()>;

    /// Remove a record permanently.
    async fn hard_delete(&self, id: i64) -> Result<()>;
}
