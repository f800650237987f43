//! One full pass over the problemset.

use std::{sync::Arc, time::Duration};

use {
    cfbot_catalog::CatalogStore,
    cfbot_config::IngestConfig,
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{
    Result,
    fetch::{PageSource, ProblemsetClient},
    parser,
};

#[derive(Debug, Clone)]
pub struct RefreshOptions {
    /// Pause between two page fetches.
    pub page_delay: Duration,
    /// Stop after this many pages.
    pub max_pages: Option<u32>,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_secs(30),
            max_pages: None,
        }
    }
}

impl From<&IngestConfig> for RefreshOptions {
    fn from(config: &IngestConfig) -> Self {
        Self {
            page_delay: Duration::from_secs(config.page_delay_secs),
            max_pages: config.max_pages,
        }
    }
}

/// Outcome of [`CatalogRefresher::refresh`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Pages fetched and stored.
    pub pages: u32,
    /// Pages skipped because fetching or parsing failed.
    pub failed_pages: u32,
    /// Tasks upserted.
    pub tasks: usize,
    /// The pass stopped early on cancellation.
    pub cancelled: bool,
}

/// Walks the listing pages and upserts every task into the catalog.
pub struct CatalogRefresher {
    source: Arc<dyn PageSource>,
    catalog: Arc<dyn CatalogStore>,
    options: RefreshOptions,
}

impl CatalogRefresher {
    pub fn new(
        source: Arc<dyn PageSource>,
        catalog: Arc<dyn CatalogStore>,
        options: RefreshOptions,
    ) -> Self {
        Self {
            source,
            catalog,
            options,
        }
    }

    /// Refresher for the live problemset described by `config`.
    pub fn from_config(config: &IngestConfig, catalog: Arc<dyn CatalogStore>) -> Result<Self> {
        let client = ProblemsetClient::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(Arc::new(client), catalog, config.into()))
    }

    /// Fetch every page and upsert its tasks.
    ///
    /// The first page gives the page count, so failing to fetch it fails the
    /// pass. Later pages that fail are logged and counted. Catalog errors
    /// abort the pass. Cancellation is honoured between pages.
    pub async fn refresh(&self, cancel: &CancellationToken) -> Result<RefreshReport> {
        let mut report = RefreshReport::default();

        let first = self.source.fetch_page(1).await?;
        let mut total = parser::parse_page_count(&first)?;
        if let Some(max) = self.options.max_pages {
            total = total.min(max);
        }
        info!(pages = total, "refreshing catalog");

        let mut pending = Some(first);
        for page in 1..=total {
            if page > 1 {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        report.cancelled = true;
                        break;
                    },
                    _ = tokio::time::sleep(self.options.page_delay) => {},
                }
            }

            let html = match pending.take() {
                Some(html) => html,
                None => match self.source.fetch_page(page).await {
                    Ok(html) => html,
                    Err(e) => {
                        warn!(page, error = %e, "failed to fetch problemset page");
                        report.failed_pages += 1;
                        continue;
                    },
                },
            };

            let tasks = match parser::parse_tasks(&html) {
                Ok(tasks) => tasks,
                Err(e) => {
                    warn!(page, error = %e, "failed to parse problemset page");
                    report.failed_pages += 1;
                    continue;
                },
            };

            for task in &tasks {
                self.catalog.upsert_task(task).await?;
            }
            report.pages += 1;
            report.tasks += tasks.len();
            debug!(page, tasks = tasks.len(), "problemset page stored");
        }

        info!(
            pages = report.pages,
            failed_pages = report.failed_pages,
            tasks = report.tasks,
            cancelled = report.cancelled,
            "catalog refresh finished"
        );
        Ok(report)
    }
}
