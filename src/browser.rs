use std::time::Duration;

use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tokio::time::timeout;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Builds per-request WebDriver sessions from a fixed set of capabilities.
pub struct BrowserLauncher {
    webdriver_url: String,
    capabilities: serde_json::Map<String, serde_json::Value>,
}

impl BrowserLauncher {
    pub fn new(config: &Config) -> Self {
        let mut capabilities = serde_json::Map::new();
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": config.browser_args }),
        );
        capabilities.insert(
            "pageLoadStrategy".to_string(),
            json!(config.page_load_strategy.as_str()),
        );

        BrowserLauncher {
            webdriver_url: config.webdriver_url.clone(),
            capabilities,
        }
    }

    pub async fn launch(&self) -> Result<BrowserSession> {
        let client = ClientBuilder::native()
            .capabilities(self.capabilities.clone())
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| AppError::Browser(format!("failed to open browser session: {}", e)))?;

        Ok(BrowserSession { client })
    }
}

/// One exclusively-owned headless browser session. Callers must run the
/// fallible page work to a `Result` first and call `close` unconditionally
/// before propagating it, so a timeout cannot leak a live browser process.
pub struct BrowserSession {
    client: Client,
}

impl BrowserSession {
    pub async fn goto(&mut self, url: &str, limit: Duration) -> Result<()> {
        timeout(limit, self.client.goto(url))
            .await
            .map_err(|_| {
                AppError::NavigationTimeout(format!(
                    "no page load for {} within {}s",
                    url,
                    limit.as_secs()
                ))
            })?
            .map_err(|e| AppError::Browser(format!("navigation to {} failed: {}", url, e)))
    }

    /// Waits for the content-marker selector that only appears once the
    /// conversation has finished client-side rendering.
    pub async fn wait_for(&mut self, css: &str, limit: Duration) -> Result<()> {
        self.client
            .wait()
            .at_most(limit)
            .for_element(Locator::Css(css))
            .await
            .map_err(|e| {
                AppError::SelectorTimeout(format!(
                    "selector {:?} did not appear within {}s: {}",
                    css,
                    limit.as_secs(),
                    e
                ))
            })?;
        Ok(())
    }

    /// Snapshot of the rendered page source.
    pub async fn source(&mut self) -> Result<String> {
        self.client
            .source()
            .await
            .map_err(|e| AppError::Browser(format!("failed to read page source: {}", e)))
    }

    /// Teardown failures are logged, never propagated: by the time we close,
    /// the page result is already decided.
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            tracing::warn!(error = %e, "failed to close browser session");
        }
    }
}
