use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use leadgen_comfyui::lead_images::ImageSetMode;
use leadgen_comfyui::poller::PollConfig;
use leadgen_pipeline::text::OllamaConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `600`). Generating a page
    /// takes several image jobs, so this is far above the poll timeout.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `600`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port: env_parse("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 600),
        }
    }
}

/// Upstream service settings for the generation pipeline.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// ComfyUI base URL.
    pub comfyui_url: String,
    pub ollama: OllamaConfig,
    pub poll: PollConfig,
    pub image_mode: ImageSetMode,
}

impl GeneratorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default                    |
    /// |---------------------|----------------------------|
    /// | `COMFYUI_URL`       | `http://localhost:8188`    |
    /// | `OLLAMA_URL`        | `http://localhost:11434`   |
    /// | `OLLAMA_MODEL`      | `llama3`                   |
    /// | `POLL_INTERVAL_MS`  | `1000`                     |
    /// | `POLL_TIMEOUT_SECS` | `120`                      |
    /// | `IMAGE_MODE`        | `sequential`               |
    ///
    /// Both poll settings must be greater than zero.
    pub fn from_env() -> Self {
        let defaults = OllamaConfig::default();

        let ollama = OllamaConfig {
            base_url: std::env::var("OLLAMA_URL").unwrap_or(defaults.base_url),
            model: std::env::var("OLLAMA_MODEL").unwrap_or(defaults.model),
            ..defaults
        };

        let poll = PollConfig::fixed(
            Duration::from_millis(env_parse_nonzero("POLL_INTERVAL_MS", 1000)),
            Duration::from_secs(env_parse_nonzero("POLL_TIMEOUT_SECS", 120)),
        );

        Self {
            comfyui_url: std::env::var("COMFYUI_URL")
                .unwrap_or_else(|_| "http://localhost:8188".into()),
            ollama,
            poll,
            image_mode: env_parse("IMAGE_MODE", ImageSetMode::Sequential),
        }
    }
}

/// Read and parse `key`, falling back to `default` when unset.
///
/// Panics at startup on an unparseable value so misconfiguration fails fast.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// [`env_parse`] for durations and counts where zero is meaningless.
fn env_parse_nonzero(key: &str, default: u64) -> u64 {
    let value = env_parse(key, default);
    if value == 0 {
        panic!("{key} must be greater than zero");
    }
    value
}
