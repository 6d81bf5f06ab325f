//! WhatsApp delivery through the Twilio Messages API.
//!
//! Plain messages use the `Body` parameter. Pre-approved templates use
//! `ContentSid` + `ContentVariables` (a JSON object serialised as a string).

use std::collections::BTreeMap;

use async_trait::async_trait;
use pillbox_core::config::TwilioConfig;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::{NotifyError, Result},
    notifier::{DeliveryId, Notifier},
};

const WHATSAPP_PREFIX: &str = "whatsapp:";

pub struct TwilioNotifier {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// Error body returned by Twilio on 4xx/5xx.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<i64>,
    message: String,
}

impl TwilioNotifier {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from: whatsapp_address(&config.from_number),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }

    /// Send a WhatsApp content template instead of free text.
    pub async fn send_template(
        &self,
        destination: &str,
        content_sid: &str,
        variables: &BTreeMap<String, String>,
    ) -> Result<DeliveryId> {
        let to = checked_destination(destination)?;
        let vars = serde_json::to_string(variables)?;
        let form = [
            ("From", self.from.as_str()),
            ("To", to.as_str()),
            ("ContentSid", content_sid),
            ("ContentVariables", vars.as_str()),
        ];
        self.post(&form).await
    }

    async fn post(&self, form: &[(&str, &str)]) -> Result<DeliveryId> {
        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(form)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "Twilio API error");
            return Err(parse_api_error(status, &text));
        }

        let msg: MessageResource = resp.json().await?;
        debug!(sid = %msg.sid, "Twilio accepted message");
        Ok(DeliveryId(msg.sid))
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    fn name(&self) -> &str {
        "twilio"
    }

    async fn send(&self, destination: &str, body: &str) -> Result<DeliveryId> {
        let to = checked_destination(destination)?;
        let form = [
            ("From", self.from.as_str()),
            ("To", to.as_str()),
            ("Body", body),
        ];
        self.post(&form).await
    }
}

/// `+5521...` -> `whatsapp:+5521...`; already-prefixed input is kept.
/// A bare digit string gets its E.164 `+` back.
fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with(WHATSAPP_PREFIX) {
        number.to_string()
    } else if number.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{WHATSAPP_PREFIX}+{number}")
    } else {
        format!("{WHATSAPP_PREFIX}{number}")
    }
}

fn checked_destination(destination: &str) -> Result<String> {
    let bare = destination.trim().trim_start_matches(WHATSAPP_PREFIX);
    if bare.is_empty() {
        return Err(NotifyError::InvalidDestination(destination.to_string()));
    }
    Ok(whatsapp_address(bare))
}

fn parse_api_error(status: u16, body: &str) -> NotifyError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(e) => NotifyError::Api {
            status,
            code: e.code,
            message: e.message,
        },
        Err(_) => NotifyError::Api {
            status,
            code: None,
            message: body.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> TwilioNotifier {
        TwilioNotifier::new(&TwilioConfig {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
            from_number: "+14155238886".to_string(),
            base_url: "https://api.twilio.com/".to_string(),
        })
    }

    #[test]
    fn messages_url_contains_account() {
        assert_eq!(
            notifier().messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn sender_gets_whatsapp_prefix() {
        assert_eq!(notifier().from, "whatsapp:+14155238886");
    }

    #[test]
    fn bare_digits_get_a_plus() {
        assert_eq!(whatsapp_address("14155238886"), "whatsapp:+14155238886");
        assert_eq!(whatsapp_address("+14155238886"), "whatsapp:+14155238886");
    }

    #[test]
    fn destination_prefix_is_not_doubled() {
        assert_eq!(
            checked_destination("whatsapp:+5521111111111").unwrap(),
            "whatsapp:+5521111111111"
        );
        assert_eq!(
            checked_destination(" +5521111111111 ").unwrap(),
            "whatsapp:+5521111111111"
        );
    }

    #[test]
    fn blank_destination_is_rejected() {
        assert!(matches!(
            checked_destination("  "),
            Err(NotifyError::InvalidDestination(_))
        ));
        assert!(matches!(
            checked_destination("whatsapp:"),
            Err(NotifyError::InvalidDestination(_))
        ));
    }

    #[test]
    fn structured_api_error_is_parsed() {
        let body = r#"{"code":21211,"message":"The 'To' number is not a valid phone number.","status":400}"#;
        match parse_api_error(400, body) {
            NotifyError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, Some(21211));
                assert!(message.contains("not a valid phone number"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unstructured_api_error_keeps_body() {
        match parse_api_error(503, "upstream unavailable") {
            NotifyError::Api { code, message, .. } => {
                assert_eq!(code, None);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_to_blank_destination_fails_before_network() {
        let err = notifier().send("", "hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::InvalidDestination(_)));
    }
}
