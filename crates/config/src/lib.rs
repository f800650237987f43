//! Configuration loading and env substitution for cfbot.
//!
//! Config files: `cfbot.toml`, `cfbot.yaml`, `cfbot.yml` or `cfbot.json`,
//! searched in `./` then the user config directory (`~/.config/cfbot/`).
//!
//! Supports `${ENV_VAR}` substitution in the raw file before parsing.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, data_dir, discover_and_load, load_config},
    schema::{BotConfig, DatabaseConfig, DialogConfig, IngestConfig, TelegramConfig},
};
