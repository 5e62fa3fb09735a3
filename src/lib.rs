pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod platforms;

use std::sync::Arc;
use tokio::sync::Semaphore;

use browser::BrowserLauncher;
use config::Config;
use llm::LlmClient;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub browser: Arc<BrowserLauncher>,
    pub llm: Arc<LlmClient>,
    /// Caps concurrently open browser sessions; waiters queue for a permit
    /// instead of each spawning another browser process.
    pub extraction_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let browser = BrowserLauncher::new(&config);
        let llm = LlmClient::new(&config);
        let extraction_slots = Semaphore::new(config.max_concurrent_extractions);

        AppState {
            config: Arc::new(config),
            browser: Arc::new(browser),
            llm: Arc::new(llm),
            extraction_slots: Arc::new(extraction_slots),
        }
    }
}
