use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

/// How far navigation must progress before `goto` is considered done.
/// `Normal` waits for the full load event, `Eager` only for DOM readiness;
/// client-rendered chat pages still need the content-marker wait either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLoadStrategy {
    Normal,
    Eager,
}

impl PageLoadStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageLoadStrategy::Normal => "normal",
            PageLoadStrategy::Eager => "eager",
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub webdriver_url: String,
    pub browser_args: Vec<String>,
    pub page_load_strategy: PageLoadStrategy,
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
    pub min_content_chars: usize,
    pub max_concurrent_extractions: usize,
    pub allowed_platforms: Option<Vec<String>>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub summary_model: String,
    pub summary_temperature: f64,
    pub summary_max_tokens: u32,
    pub summary_max_chars: usize,
    pub llm_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        // Server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3001".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;
        let server_addr = SocketAddr::new(ip, port);

        // Browser configuration
        let webdriver_url = env::var("WEBDRIVER_URL").unwrap_or_else(|_| "http://localhost:9515".to_string());
        let browser_args = match env::var("BROWSER_ARGS") {
            Ok(raw) => raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
            Err(_) => vec![
                "--headless=new".to_string(),
                "--no-sandbox".to_string(),
                "--disable-setuid-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
        };
        let page_load_strategy = match env::var("PAGE_LOAD_STRATEGY").as_deref() {
            Ok("eager") => PageLoadStrategy::Eager,
            _ => PageLoadStrategy::Normal,
        };
        let navigation_timeout = Duration::from_secs(read_u64("NAVIGATION_TIMEOUT_SECS", 60));
        let selector_timeout = Duration::from_secs(read_u64("SELECTOR_TIMEOUT_SECS", 15));
        let min_content_chars = read_u64("MIN_CONTENT_CHARS", 20) as usize;
        let max_concurrent_extractions = read_u64("MAX_CONCURRENT_EXTRACTIONS", 4).max(1) as usize;
        let allowed_platforms = match env::var("ALLOWED_PLATFORMS") {
            Ok(raw) => {
                let names: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if names.is_empty() { None } else { Some(names) }
            }
            Err(_) => None,
        };

        // Completion API configuration; a missing key is surfaced per request,
        // not at startup, so the extraction endpoint stays usable without it.
        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();
        let summary_model = env::var("SUMMARY_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let summary_temperature = env::var("SUMMARY_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(0.3);
        let summary_max_tokens = read_u64("SUMMARY_MAX_TOKENS", 1024) as u32;
        let summary_max_chars = read_u64("SUMMARY_MAX_CHARS", 15_000) as usize;
        let llm_timeout = Duration::from_secs(read_u64("LLM_TIMEOUT_SECS", 60));

        Ok(Config {
            server_addr,
            webdriver_url,
            browser_args,
            page_load_strategy,
            navigation_timeout,
            selector_timeout,
            min_content_chars,
            max_concurrent_extractions,
            allowed_platforms,
            openai_api_key,
            openai_base_url,
            summary_model,
            summary_temperature,
            summary_max_tokens,
            summary_max_chars,
            llm_timeout,
        })
    }
}

fn read_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(v) => v.parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}
