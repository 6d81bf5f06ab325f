//! `pillbox-store`: persistence for medicine records.
//!
//! Every backend implements [`MedicineStore`]; [`open_store`] picks one from
//! configuration.
//!
//! | Backend    | Where records live                               |
//! |------------|--------------------------------------------------|
//! | `sqlite`   | Local file, `medicines` table                    |
//! | `supabase` | Hosted Postgres, reached through the REST API    |
//!
//! The supabase backend also speaks the `legacy` schema: the `remedios`
//! table with Portuguese column names and an `excluido` `'N'`/`'S'` flag.

pub mod backends;
pub mod db;
pub mod error;
pub mod store;

use std::sync::Arc;

use pillbox_core::config::{StoreBackend, StoreConfig};

pub use backends::{SqliteStore, SupabaseStore};
pub use error::{Result, StoreError};
pub use store::MedicineStore;

/// Build the store selected by `config.backend`.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn MedicineStore>> {
    match config.backend {
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(&config.sqlite.path)?;
            Ok(Arc::new(store))
        }
        StoreBackend::Supabase => {
            let sb = config.supabase.as_ref().ok_or_else(|| {
                StoreError::Config("store.backend is supabase but [store.supabase] is missing".into())
            })?;
            if !sb.is_complete() {
                return Err(StoreError::Config(
                    "store.supabase needs both url and api_key".into(),
                ));
            }
            Ok(Arc::new(SupabaseStore::new(sb)))
        }
    }
}
