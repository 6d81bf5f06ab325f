//! `pillbox-notify`: outbound message transports.
//!
//! A transport accepts a destination phone number and a text body and returns
//! the provider's delivery id, or fails. Callers never retry.

pub mod console;
pub mod error;
pub mod notifier;
pub mod twilio;

use std::sync::Arc;

use pillbox_core::config::{NotifyConfig, TransportKind};

pub use console::ConsoleNotifier;
pub use error::{NotifyError, Result};
pub use notifier::{DeliveryId, Notifier};
pub use twilio::TwilioNotifier;

/// Build the transport selected by `config.transport`.
pub fn build_notifier(config: &NotifyConfig) -> Result<Arc<dyn Notifier>> {
    match config.transport {
        TransportKind::Twilio => {
            let tw = config.twilio.as_ref().ok_or_else(|| {
                NotifyError::Config("notify.transport is twilio but [notify.twilio] is missing".into())
            })?;
            if !tw.is_complete() {
                return Err(NotifyError::Config(
                    "notify.twilio needs both account_sid and auth_token".into(),
                ));
            }
            Ok(Arc::new(TwilioNotifier::new(tw)))
        }
        TransportKind::Console => Ok(Arc::new(ConsoleNotifier::new())),
    }
}
