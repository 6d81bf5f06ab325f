//! `pillbox-scheduler`: fixed-time medicine reminders.
//!
//! # Overview
//!
//! The [`engine::SchedulerLoop`] sleeps for the poll interval and then runs the
//! [`job::ReminderJob`] once, forever. Each run compares the local wall-clock
//! time (`HH:MM`) with the configured trigger times; on a match it reads every
//! active medicine from the store, renders one digest and sends it to every
//! recipient in turn.
//!
//! Nothing is remembered between runs. A trigger missed while the process was
//! down is not caught up, and two runs inside the same matching minute both
//! send.

pub mod digest;
pub mod engine;
pub mod error;
pub mod job;
pub mod trigger;

pub use engine::SchedulerLoop;
pub use error::{Result, SchedulerError};
pub use job::{ReminderJob, TickOutcome};
pub use trigger::TriggerTimes;
