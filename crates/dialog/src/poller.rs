//! Long-poll update loop.

use std::time::Duration;

use {
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use crate::{
    Error, Result,
    dispatch::Dispatcher,
    gateway::{InboundUpdate, UpdateSource},
};

#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Pause after a failed fetch before polling again.
    pub retry_delay: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Pull updates from `source` and dispatch them one at a time until `cancel`
/// fires or the source reports [`Error::Terminated`].
///
/// The offset moves past each update before it is dispatched, so an update
/// is delivered at most once even when handling it fails. Returns the next
/// offset on a clean shutdown.
pub async fn run_polling(
    source: &dyn UpdateSource,
    dispatcher: &Dispatcher,
    options: PollOptions,
    cancel: CancellationToken,
) -> Result<i64> {
    info!("starting update loop");
    let mut offset: i64 = 0;

    loop {
        if cancel.is_cancelled() {
            break;
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => break,
            fetched = source.fetch_updates(offset) => fetched,
        };

        match fetched {
            Ok(updates) => {
                if !updates.is_empty() {
                    debug!(offset, count = updates.len(), "got updates");
                }
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    handle_update(dispatcher, update).await;
                }
            },
            Err(Error::Terminated { reason }) => {
                warn!(offset, %reason, "update source terminated, stopping update loop");
                cancel.cancel();
                return Err(Error::Terminated { reason });
            },
            Err(e) => {
                warn!(offset, error = %e, "fetching updates failed");
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(options.retry_delay) => {},
                }
            },
        }
    }

    info!(offset, "update loop stopped");
    Ok(offset)
}

async fn handle_update(dispatcher: &Dispatcher, update: InboundUpdate) {
    let update_id = update.update_id;
    let Some(message) = update.message else {
        debug!(update_id, "ignoring non-message update");
        return;
    };
    if let Err(e) = dispatcher.dispatch(&message).await {
        error!(
            update_id,
            chat_id = message.chat_id,
            error = %e,
            "error handling message"
        );
    }
}
