use std::collections::BTreeMap;
use std::fmt;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de, Deserialize, Deserializer, Serialize};

pub const DEFAULT_TRIGGER_TIMES: [&str; 2] = ["08:00", "20:00"];
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
/// Twilio's shared WhatsApp sandbox sender.
pub const DEFAULT_TWILIO_FROM: &str = "+14155238886";
pub const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com";
pub const DEFAULT_SUPABASE_TABLE: &str = "medicines";
pub const LEGACY_SUPABASE_TABLE: &str = "remedios";

/// Top-level config (pillbox.toml + PILLBOX_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PillboxConfig {
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// What the reminder job sends, to whom, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Destination phone numbers (E.164). Empty means nothing is ever sent.
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Local wall-clock times, `HH:MM`, at which the digest goes out.
    #[serde(default = "default_trigger_times")]
    pub trigger_times: Vec<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            recipients: Vec::new(),
            trigger_times: default_trigger_times(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    /// Local embedded database file.
    #[default]
    Sqlite,
    /// Hosted Postgres behind the Supabase REST API.
    Supabase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub sqlite: SqliteConfig,
    pub supabase: Option<SupabaseConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Row layout of the remote table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SupabaseSchema {
    /// English columns, boolean `deleted`.
    #[default]
    Standard,
    /// The first deployment's `remedios` table: Portuguese columns and
    /// `excluido` set to `'N'` / `'S'`.
    Legacy,
}

/// Fields may be blank after loading; `open_store` rejects that only when
/// the supabase backend is actually selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co` (no trailing slash needed).
    #[serde(default)]
    pub url: String,
    /// Service or anon key; sent as both `apikey` and bearer token.
    #[serde(default, deserialize_with = "lenient_string")]
    pub api_key: String,
    #[serde(default)]
    pub schema: SupabaseSchema,
    /// Defaults to `medicines`, or `remedios` for the legacy schema.
    #[serde(default)]
    pub table: Option<String>,
}

impl SupabaseConfig {
    pub fn table_name(&self) -> &str {
        match (self.table.as_deref(), self.schema) {
            (Some(table), _) => table,
            (None, SupabaseSchema::Standard) => DEFAULT_SUPABASE_TABLE,
            (None, SupabaseSchema::Legacy) => LEGACY_SUPABASE_TABLE,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    #[default]
    Twilio,
    /// Log the message instead of sending it.
    Console,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub transport: TransportKind,
    pub twilio: Option<TwilioConfig>,
}

/// Credentials may be blank after loading; `build_notifier` rejects that
/// only when the twilio transport is selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_sid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub auth_token: String,
    /// WhatsApp-enabled sender number, without the `whatsapp:` prefix.
    #[serde(default = "default_twilio_from", deserialize_with = "lenient_string")]
    pub from_number: String,
    #[serde(default = "default_twilio_base_url")]
    pub base_url: String,
}

impl TwilioConfig {
    pub fn is_complete(&self) -> bool {
        !self.account_sid.trim().is_empty() && !self.auth_token.trim().is_empty()
    }
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: default_twilio_from(),
            base_url: default_twilio_base_url(),
        }
    }
}

fn default_trigger_times() -> Vec<String> {
    DEFAULT_TRIGGER_TIMES.iter().map(|t| t.to_string()).collect()
}
fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
fn default_twilio_from() -> String {
    DEFAULT_TWILIO_FROM.to_string()
}
fn default_twilio_base_url() -> String {
    DEFAULT_TWILIO_BASE_URL.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.pillbox/pillbox.db", home)
}

impl PillboxConfig {
    /// Load config from a TOML file with env var overrides.
    ///
    /// The file is the first of:
    ///   1. Explicit path argument
    ///   2. `$PILLBOX_CONFIG`
    ///   3. ~/.pillbox/pillbox.toml
    ///
    /// Then applies the bare `TWILIO_*` / `SUPABASE_*` variables and finally
    /// `PILLBOX_*` (nested keys split on `__`, e.g.
    /// `PILLBOX_REMINDERS__POLL_INTERVAL_SECS=30`).
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Self::extract(Figment::new().merge(Toml::file(&path)))
    }

    /// Parse a TOML document, still honouring env overrides.
    pub fn from_toml_str(toml: &str) -> crate::error::Result<Self> {
        Self::extract(Figment::new().merge(Toml::string(toml)))
    }

    /// Defaults plus environment overrides, no file.
    pub fn from_env() -> crate::error::Result<Self> {
        Self::extract(Figment::new())
    }

    fn extract(base: Figment) -> crate::error::Result<Self> {
        base.merge(legacy_env())
            .merge(Env::prefixed("PILLBOX_").split("__"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))
    }
}

/// Variable names used by earlier deployments and the key each one sets.
const LEGACY_VARS: [(&str, [&str; 3]); 5] = [
    ("TWILIO_ACCOUNT_SID", ["notify", "twilio", "account_sid"]),
    ("TWILIO_AUTH_TOKEN", ["notify", "twilio", "auth_token"]),
    ("TWILIO_WHATSAPP_NUMBER", ["notify", "twilio", "from_number"]),
    ("SUPABASE_URL", ["store", "supabase", "url"]),
    ("SUPABASE_KEY", ["store", "supabase", "api_key"]),
];

type LegacyTree = BTreeMap<&'static str, BTreeMap<&'static str, BTreeMap<&'static str, String>>>;

/// Legacy variables as plain strings; `Env` would read `+14155238886` as a
/// number.
fn legacy_env() -> Serialized<LegacyTree> {
    let mut tree = LegacyTree::new();
    for (name, [section, table, key]) in LEGACY_VARS {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => {
                tree.entry(section)
                    .or_default()
                    .entry(table)
                    .or_default()
                    .insert(key, value);
            }
            _ => {}
        }
    }
    Serialized::defaults(tree)
}

/// Accepts numbers as well as strings. `PILLBOX_*` values go through env type
/// guessing, so an all-digit token arrives as an integer.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientString;

    impl de::Visitor<'_> for LenientString {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(LenientString)
}

fn default_config_path() -> String {
    if let Ok(path) = std::env::var("PILLBOX_CONFIG") {
        return path;
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.pillbox/pillbox.toml", home)
}
