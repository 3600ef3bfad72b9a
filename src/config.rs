//! Relay configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_GESTURE_PORT: u16 = 8884;
pub const DEFAULT_PAGE_PORT: u16 = 8000;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_INDEX_HTML: &str = "static/index.html";
pub const DEFAULT_OVERLAY_WIDTH: u32 = 800;
pub const DEFAULT_OVERLAY_HEIGHT: u32 = 600;
pub const DEFAULT_CONSUMER_BUFFER: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: '{value}' is not a port number")]
    InvalidPort { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub bind_host: String,
    pub gesture_port: u16,
    pub page_port: u16,
    pub index_html: PathBuf,
    /// `None` runs without a local overlay observer.
    pub overlay: Option<OverlayConfig>,
    pub consumer_buffer: usize,
}

impl RelayConfig {
    /// Build typed relay config from environment variables.
    ///
    /// Optional:
    /// - `GESTURE_PORT`: websocket port, default 8884
    /// - `PAGE_PORT`: static page port, default 8000
    /// - `BIND_HOST`: default `0.0.0.0`
    /// - `INDEX_HTML`: page served at `/`, default `static/index.html`
    /// - `OVERLAY_ENABLED`: `1`/`true` attaches the local pointer overlay
    /// - `OVERLAY_WIDTH` / `OVERLAY_HEIGHT`: default 800x600
    /// - `CONSUMER_BUFFER`: outbound queue depth per consumer, default 256
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if a port variable is set but
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gesture_port = parse_port("GESTURE_PORT", DEFAULT_GESTURE_PORT)?;
        let page_port = parse_port("PAGE_PORT", DEFAULT_PAGE_PORT)?;
        let bind_host = std::env::var("BIND_HOST").unwrap_or_else(|_| DEFAULT_BIND_HOST.to_string());
        let index_html = std::env::var("INDEX_HTML").map_or_else(|_| PathBuf::from(DEFAULT_INDEX_HTML), PathBuf::from);

        let overlay = env_flag("OVERLAY_ENABLED").then(|| OverlayConfig {
            width: env_parse("OVERLAY_WIDTH", DEFAULT_OVERLAY_WIDTH),
            height: env_parse("OVERLAY_HEIGHT", DEFAULT_OVERLAY_HEIGHT),
        });
        let consumer_buffer = env_parse("CONSUMER_BUFFER", DEFAULT_CONSUMER_BUFFER).max(1);

        Ok(Self { bind_host, gesture_port, page_port, index_html, overlay, consumer_buffer })
    }

    #[must_use]
    pub fn gesture_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.gesture_port)
    }

    #[must_use]
    pub fn page_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.page_port)
    }
}

fn parse_port(var: &'static str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { var, value }),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key).is_ok_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
