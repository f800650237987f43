mod bot_command;
mod db_commands;
mod users_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    cfbot_catalog::CatalogStore,
    cfbot_config::BotConfig,
    cfbot_ingest::CatalogRefresher,
    clap::{Parser, Subcommand},
    tokio_util::sync::CancellationToken,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "cfbot", about = "Codeforces task picker bot for Telegram")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to load instead of searching the standard locations.
    #[arg(long, global = true, env = "CFBOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot (default when no subcommand is provided).
    Run,
    /// Scrape the problemset once and update the catalog.
    Refresh,
    /// User management.
    Users {
        #[command(subcommand)]
        action: users_commands::UsersAction,
    },
    /// Database management.
    Db {
        #[command(subcommand)]
        action: db_commands::DbAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<BotConfig> {
    let mut config = match &cli.config {
        Some(path) => cfbot_config::load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => cfbot_config::discover_and_load(),
    };
    cfbot_config::apply_env_overrides(&mut config);
    Ok(config)
}

/// Cancel `cancel` on Ctrl-C.
fn cancel_on_ctrl_c(cancel: &CancellationToken) {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            cancel.cancel();
        }
    });
}

async fn refresh(config: &BotConfig) -> anyhow::Result<()> {
    let catalog = Arc::new(db_commands::open_catalog(&config.database).await?);
    let refresher =
        CatalogRefresher::from_config(&config.ingest, catalog as Arc<dyn CatalogStore>)?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);

    let report = refresher.refresh(&cancel).await?;
    println!(
        "Stored {} tasks from {} pages ({} failed){}",
        report.tasks,
        report.pages,
        report.failed_pages,
        if report.cancelled {
            ", stopped early"
        } else {
            ""
        }
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "cfbot starting");

    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Run) => bot_command::run_bot(config).await,
        Some(Commands::Refresh) => refresh(&config).await,
        Some(Commands::Users { action }) => users_commands::handle_users(action, &config).await,
        Some(Commands::Db { action }) => db_commands::handle_db(action, &config).await,
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, clap::CommandFactory};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["cfbot"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cfbot",
            "users",
            "verify",
            "ABCD2345",
            "--json-logs",
            "--config",
            "/tmp/cfbot.toml",
        ])
        .unwrap();
        assert!(cli.json_logs);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cfbot.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Users {
                action: users_commands::UsersAction::Verify { ref code }
            }) if code == "ABCD2345"
        ));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.toml");
        std::fs::write(&path, "[dialog]\ntask_limit = 3\n").unwrap();

        let cli = Cli::try_parse_from(["cfbot", "--config", path.to_str().unwrap()]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.dialog.task_limit, 3);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["cfbot", "--config", "/nonexistent/cfbot.toml"]).unwrap();
        assert!(load_config(&cli).is_err());
    }
}
