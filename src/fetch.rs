use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::debug;

const USER_AGENT: &str = concat!("gen1_scraper/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 30;

/// Sequential HTTP client: one request in flight, optional pause between requests.
pub struct Fetcher {
    client: reqwest::Client,
    delay: Duration,
}

impl Fetcher {
    pub fn new(delay: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Fetcher { client, delay })
    }

    pub fn with_client(client: reqwest::Client, delay: Duration) -> Self {
        Fetcher { client, delay }
    }

    /// GET a page as text. Non-2xx statuses are errors.
    pub async fn text(&self, url: &str) -> Result<String> {
        let start = Instant::now();
        let body = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;
        debug!("GET {} ({} bytes, {} ms)", url, body.len(), start.elapsed().as_millis());
        self.pause().await;
        Ok(body)
    }

    /// GET raw bytes (sprites). Non-2xx statuses are errors.
    pub async fn bytes(&self, url: &str) -> Result<Vec<u8>> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;
        self.pause().await;
        Ok(body.to_vec())
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
