//! HTTP access to the problemset listing.

use std::time::Duration;

use {async_trait::async_trait, tracing::trace};

use crate::Result;

/// Source of problemset listing pages as raw HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch listing page `page` (1-based).
    async fn fetch_page(&self, page: u32) -> Result<String>;
}

/// Fetches pages from the live problemset, most solved first.
pub struct ProblemsetClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProblemsetClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cfbot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { client, base_url })
    }

    pub fn page_url(&self, page: u32) -> String {
        format!("{}page/{page}?order=BY_SOLVED_DESC", self.base_url)
    }
}

#[async_trait]
impl PageSource for ProblemsetClient {
    async fn fetch_page(&self, page: u32) -> Result<String> {
        let url = self.page_url(page);
        trace!(%url, "fetching problemset page");
        let html = self
            .client
            .get(&url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        trace!(page, bytes = html.len(), "problemset page received");
        Ok(html)
    }
}
