//! Config schema types (telegram, database, dialog, ingest).

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub database: DatabaseConfig,
    pub dialog: DialogConfig,
    pub ingest: IngestConfig,
}

/// Telegram bot account settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Long-poll timeout passed to `getUpdates` (seconds).
    pub poll_timeout_secs: u32,

    /// Delay before retrying a failed `getUpdates` call (seconds).
    pub retry_delay_secs: u64,

    /// Register the slash command list with Telegram on connect.
    pub register_commands: bool,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .finish_non_exhaustive()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

impl TelegramConfig {
    pub fn has_token(&self) -> bool {
        !self.token.expose_secret().trim().is_empty()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            poll_timeout_secs: 30,
            retry_delay_secs: 5,
            register_commands: true,
        }
    }
}

/// Catalog/user database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL. Defaults to `cfbot.db` in the data directory.
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = crate::loader::data_dir().join("cfbot.db");
        Self {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections: 5,
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Maximum number of tasks listed in one reply.
    pub task_limit: u32,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self { task_limit: 10 }
    }
}

/// Problemset scraping and refresh schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Run the scheduled refresh alongside the bot.
    pub enabled: bool,
    /// Problemset root; pages are fetched from `{base_url}page/{n}`.
    pub base_url: String,
    /// Cron expression (5, 6 or 7 fields) for scheduled refreshes, UTC.
    pub schedule: String,
    /// Pause between two page fetches (seconds).
    pub page_delay_secs: u64,
    /// Stop after this many pages. `None` walks the whole problemset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
    pub request_timeout_secs: u64,
    /// Refresh once immediately when the bot starts.
    pub run_on_start: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://codeforces.com/problemset/".into(),
            schedule: "0 0 3 * * *".into(),
            page_delay_secs: 30,
            max_pages: None,
            request_timeout_secs: 30,
            run_on_start: false,
        }
    }
}
