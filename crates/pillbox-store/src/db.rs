use rusqlite::Connection;

use crate::error::Result;

/// Initialise the medicine schema in `conn`. Safe to call on every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS medicines (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT    NOT NULL,
            quantity    TEXT    NOT NULL,
            frequency   TEXT    NOT NULL,
            phone       TEXT    NOT NULL DEFAULT '',
            start_date  TEXT    NOT NULL,   -- YYYY-MM-DD
            end_date    TEXT    NOT NULL,   -- YYYY-MM-DD
            deleted     INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT    NOT NULL,
            updated_at  TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_medicines_deleted ON medicines (deleted);
        ",
    )?;
    Ok(())
}
