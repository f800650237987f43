use std::path::PathBuf;

use {
    anyhow::Context,
    cfbot_catalog::{CatalogStore, SqliteCatalog},
    cfbot_config::{BotConfig, DatabaseConfig},
    clap::Subcommand,
};

#[derive(Subcommand)]
pub enum DbAction {
    /// Run all pending database migrations.
    Migrate,
    /// Show task, category and user counts.
    Stats,
}

pub async fn handle_db(action: DbAction, config: &BotConfig) -> anyhow::Result<()> {
    match action {
        DbAction::Migrate => {
            // Opening the store applies pending migrations.
            open_catalog(&config.database).await?;
            println!("Database is up to date: {}", config.database.url);
        },
        DbAction::Stats => {
            let stats = open_catalog(&config.database).await?.stats().await?;
            println!("Tasks:      {}", stats.tasks);
            println!("Categories: {}", stats.categories);
            println!("Users:      {}", stats.users);
        },
    }
    Ok(())
}

/// Open the configured catalog, creating the database directory if needed.
pub async fn open_catalog(config: &DatabaseConfig) -> anyhow::Result<SqliteCatalog> {
    if let Some(parent) = sqlite_file_path(&config.url).and_then(|p| p.parent().map(PathBuf::from))
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(&parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    SqliteCatalog::new(&config.url, config.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.url))
}

/// Filesystem path of a `sqlite:` URL, or `None` for in-memory databases.
fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}
