use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2500;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub api_base_url: String,
    /// Artificial latency before a mock analysis completes.
    pub analysis_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = std::env::var("SMARTFOOD_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".smartfood"));
        let api_base_url = std::env::var("SMARTFOOD_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.into());
        anyhow::ensure!(
            api_base_url.starts_with("http://") || api_base_url.starts_with("https://"),
            "SMARTFOOD_API_BASE_URL must be an http(s) url, got {api_base_url}"
        );
        let analysis_delay_ms = std::env::var("SMARTFOOD_ANALYSIS_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_ANALYSIS_DELAY_MS);

        Ok(Self {
            data_dir,
            api_base_url,
            analysis_delay: Duration::from_millis(analysis_delay_ms),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".smartfood"),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            analysis_delay: Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS),
        }
    }
}
