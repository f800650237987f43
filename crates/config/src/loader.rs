use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    Error, Result,
    env_subst::substitute_env,
    schema::BotConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["cfbot.toml", "cfbot.yaml", "cfbot.yml", "cfbot.json"];

const ENV_TOKEN: &str = "CFBOT_TELEGRAM_TOKEN";
const ENV_DATABASE_URL: &str = "CFBOT_DATABASE_URL";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<BotConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&substitute_env(&raw), path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./cfbot.{toml,yaml,yml,json}`
/// 2. `~/.config/cfbot/cfbot.{toml,yaml,yml,json}`
///
/// Returns `BotConfig::default()` if no file is found or it fails to parse.
pub fn discover_and_load() -> BotConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    BotConfig::default()
}

/// Apply `CFBOT_*` environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: &mut BotConfig) {
    apply_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_overrides_with(config: &mut BotConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
        config.telegram.token = Secret::new(token);
    }
    if let Some(url) = lookup(ENV_DATABASE_URL).filter(|v| !v.is_empty()) {
        config.database.url = url;
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/cfbot/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "cfbot").map(|d| d.config_dir().to_path_buf())
}

/// Returns the data directory holding the default database, or `.` when the
/// platform has no home directory.
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "cfbot")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn parse_config(raw: &str, path: &Path) -> Result<BotConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::unsupported_format(other)),
    }
}
