//! Background task that refreshes the catalog on a cron schedule.

use std::sync::Arc;

use {
    chrono::Utc,
    cron::Schedule,
    tokio_util::sync::CancellationToken,
    tracing::{error, info},
};

use crate::{Result, refresh::CatalogRefresher, schedule};

pub struct RefreshService {
    refresher: Arc<CatalogRefresher>,
    schedule: Schedule,
    run_on_start: bool,
}

impl RefreshService {
    pub fn new(refresher: Arc<CatalogRefresher>, expr: &str, run_on_start: bool) -> Result<Self> {
        Ok(Self {
            refresher,
            schedule: schedule::parse_schedule(expr)?,
            run_on_start,
        })
    }

    /// Refresh on schedule until `cancel` fires or the schedule has no more
    /// runs. A failed refresh is logged and the next run still happens.
    pub async fn run(self, cancel: CancellationToken) {
        if self.run_on_start {
            self.run_once(&cancel).await;
        }

        loop {
            let now = Utc::now();
            let Some(next) = schedule::next_run(&self.schedule, now) else {
                info!("refresh schedule has no upcoming runs");
                return;
            };
            info!(next_run = %next, "next catalog refresh scheduled");

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {},
            }
            self.run_once(&cancel).await;
        }

        info!("refresh service stopped");
    }

    async fn run_once(&self, cancel: &CancellationToken) {
        if let Err(e) = self.refresher.refresh(cancel).await {
            error!(error = %e, "catalog refresh failed");
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicU32, Ordering},
        time::Duration,
    };

    use {
        super::*,
        crate::{Error, fetch::PageSource, refresh::RefreshOptions},
        async_trait::async_trait,
        cfbot_catalog::{CatalogStore, InMemoryCatalog},
    };

    struct CountingPages {
        fetches: Arc<AtomicU32>,
    }

    #[async_trait]
    impl PageSource for CountingPages {
        async fn fetch_page(&self, _page: u32) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Err(Error::message("offline"))
        }
    }

    fn refresher(fetches: &Arc<AtomicU32>) -> Arc<CatalogRefresher> {
        Arc::new(CatalogRefresher::new(
            Arc::new(CountingPages {
                fetches: Arc::clone(fetches),
            }),
            Arc::new(InMemoryCatalog::new()) as Arc<dyn CatalogStore>,
            RefreshOptions::default(),
        ))
    }

    #[test]
    fn rejects_invalid_schedule() {
        let fetches = Arc::new(AtomicU32::new(0));
        assert!(RefreshService::new(refresher(&fetches), "not cron", false).is_err());
    }

    #[tokio::test]
    async fn run_on_start_refreshes_then_stops_on_cancel() {
        let fetches = Arc::new(AtomicU32::new(0));
        let service = RefreshService::new(refresher(&fetches), "0 0 3 1 1 *", true).unwrap();
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(service.run(cancel.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("service should stop on cancel")
            .unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn without_run_on_start_waits_for_schedule() {
        let fetches = Arc::new(AtomicU32::new(0));
        let service = RefreshService::new(refresher(&fetches), "0 0 3 1 1 *", false).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        service.run(cancel).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }
}
