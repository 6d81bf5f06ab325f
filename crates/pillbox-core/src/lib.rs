//! `pillbox-core`: types, configuration and helpers shared by every pillbox crate.

pub mod config;
pub mod dates;
pub mod error;
pub mod session;
pub mod types;

pub use error::{CoreError, Result};
pub use types::{MedicineRecord, MedicineUpdate, NewMedicine};
