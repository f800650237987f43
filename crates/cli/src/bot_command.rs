use std::{sync::Arc, time::Duration};

use {
    cfbot_catalog::{CatalogStore, UserDirectory},
    cfbot_config::BotConfig,
    cfbot_dialog::{
        DialogEngine, Dispatcher, InMemorySessionStore, Outbound, PollOptions, run_polling,
    },
    cfbot_ingest::{CatalogRefresher, RefreshService},
    cfbot_telegram::TelegramGateway,
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
};

use crate::{cancel_on_ctrl_c, db_commands::open_catalog};

/// Run the bot until Ctrl-C, with the scheduled refresh alongside if enabled.
pub async fn run_bot(config: BotConfig) -> anyhow::Result<()> {
    let catalog = Arc::new(open_catalog(&config.database).await?);
    let gateway = Arc::new(TelegramGateway::connect(&config.telegram).await?);

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);

    let refresh_task = if config.ingest.enabled {
        let refresher = CatalogRefresher::from_config(
            &config.ingest,
            Arc::clone(&catalog) as Arc<dyn CatalogStore>,
        )?;
        let service = RefreshService::new(
            Arc::new(refresher),
            &config.ingest.schedule,
            config.ingest.run_on_start,
        )?;
        Some(tokio::spawn(service.run(cancel.clone())))
    } else {
        info!("scheduled catalog refresh disabled");
        None
    };

    let engine = DialogEngine::new(
        Arc::clone(&catalog) as Arc<dyn CatalogStore>,
        Arc::clone(&gateway) as Arc<dyn Outbound>,
        Arc::new(InMemorySessionStore::new()),
    )
    .with_task_limit(config.dialog.task_limit);
    let dispatcher = Dispatcher::new(
        catalog as Arc<dyn UserDirectory>,
        Arc::clone(&gateway) as Arc<dyn Outbound>,
        engine,
    );

    let options = PollOptions {
        retry_delay: Duration::from_secs(config.telegram.retry_delay_secs),
    };
    let result = run_polling(gateway.as_ref(), &dispatcher, options, cancel.clone()).await;

    cancel.cancel();
    if let Some(handle) = refresh_task
        && let Err(e) = handle.await
    {
        warn!(error = %e, "refresh service task failed");
    }

    let offset = result?;
    info!(offset, "cfbot stopped");
    Ok(())
}
