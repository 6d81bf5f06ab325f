use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use pillbox_core::{MedicineRecord, NewMedicine};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::{
    db::init_db,
    error::{Result, StoreError},
    store::MedicineStore,
};

const SELECT_COLUMNS: &str =
    "SELECT id, name, quantity, frequency, phone, start_date, end_date, deleted FROM medicines";

/// Record store backed by a local SQLite file.
///
/// Thread-safe: the connection sits behind a Mutex and every call holds it
/// for the duration of a single statement.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and run migrations.
    pub fn open(path: &str) -> Result<Self> {
        ensure_parent_dir(path)?;
        info!(%path, "opening SQLite database");
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    /// Throwaway database, gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an already open connection, e.g. `Connection::open_in_memory()`.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MedicineStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn insert(&self, medicine: &NewMedicine) -> Result<MedicineRecord> {
        medicine.validate()?;
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO medicines
             (name, quantity, frequency, phone, start_date, end_date, deleted,
              created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)",
            rusqlite::params![
                medicine.name,
                medicine.quantity,
                medicine.frequency,
                medicine.phone,
                medicine.start_date,
                medicine.end_date,
                now
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(record_id = id, name = %medicine.name, "medicine inserted");

        Ok(MedicineRecord {
            id,
            name: medicine.name.clone(),
            quantity: medicine.quantity.clone(),
            frequency: medicine.frequency.clone(),
            phone: medicine.phone.clone(),
            start_date: medicine.start_date.clone(),
            end_date: medicine.end_date.clone(),
            deleted: false,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<MedicineRecord>> {
        let record = self
            .conn()
            .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], row_to_record)
            .optional()?;
        Ok(record)
    }

    async fn list_active(&self) -> Result<Vec<MedicineRecord>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare_cached(&format!("{SELECT_COLUMNS} WHERE deleted = 0 ORDER BY id"))?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = records.len(), "listed active medicines");
        Ok(records)
    }

    async fn update(&self, id: i64, medicine: &NewMedicine) -> Result<()> {
        medicine.validate()?;
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let n = conn.execute(
            "UPDATE medicines SET name = ?1, quantity = ?2, frequency = ?3, phone = ?4,
                    start_date = ?5, end_date = ?6, updated_at = ?7
             WHERE id = ?8",
            rusqlite::params![
                medicine.name,
                medicine.quantity,
                medicine.frequency,
                medicine.phone,
                medicine.start_date,
                medicine.end_date,
                now,
                id
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { id });
        }
        info!(record_id = id, "medicine updated");
        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<()> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let n = conn.execute(
            "UPDATE medicines SET deleted = 1, updated_at = ?1 WHERE id = ?2",
            rusqlite::params![now, id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { id });
        }
        info!(record_id = id, "medicine marked deleted");
        Ok(())
    }

    async fn hard_delete(&self, id: i64) -> Result<()> {
        let n = self.conn().execute("DELETE FROM medicines WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(StoreError::NotFound { id });
        }
        info!(record_id = id, "medicine removed");
        Ok(())
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<MedicineRecord> {
    Ok(MedicineRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        frequency: row.get(3)?,
        phone: row.get(4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        deleted: row.get::<_, i64>(7)? != 0,
    })
}

fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
