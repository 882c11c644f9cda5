use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Host that serves page images for every book, regardless of the viewer host.
pub const DEFAULT_IMAGE_HOST: &str = "https://online.anyflip.com/";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/flipdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipdlConfig {
    /// Base URL page images are fetched from.
    #[serde(default = "default_image_host")]
    pub image_host: String,
    /// Connect timeout in seconds for every request.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds; 0 disables it. A missing key keeps the default.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Skip TLS certificate and host verification.
    #[serde(default)]
    pub insecure: bool,
    /// Concurrent page downloads; 1 fetches pages strictly in order.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Optional User-Agent header sent with every request.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional retry policy; if missing, requests are attempted once.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// External command that turns page images into one document.
    /// `{output}` is replaced by the output path, `{pages}` by every page path in order.
    #[serde(default)]
    pub assemble_command: Option<Vec<String>>,
}

fn default_image_host() -> String {
    DEFAULT_IMAGE_HOST.to_string()
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_timeout() -> u64 {
    300
}

fn default_workers() -> usize {
    1
}

impl Default for FlipdlConfig {
    fn default() -> Self {
        Self {
            image_host: default_image_host(),
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
            insecure: false,
            workers: default_workers(),
            user_agent: None,
            retry: None,
            assemble_command: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("flipdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FlipdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FlipdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FlipdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
