//! Server Configuration

use std::time::Duration as StdDuration;

use chrono::Duration;

/// Environment-driven server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Public base URL of this deployment (for webhook registration)
    pub app_url: Option<String>,

    /// Expected `X-Telegram-Bot-Api-Secret-Token` header value
    pub webhook_secret: Option<String>,

    /// Session time-to-live; unresolved sessions past this age are swept
    pub session_ttl: Duration,

    /// How often the sweep runs
    pub sweep_interval: StdDuration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:10000".into(),
            app_url: None,
            webhook_secret: None,
            session_ttl: Duration::minutes(30),
            sweep_interval: StdDuration::from_secs(300),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let session_ttl = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .map_or(defaults.session_ttl, Duration::seconds);

        let sweep_interval = std::env::var("SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(defaults.sweep_interval, StdDuration::from_secs);

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            app_url: std::env::var("APP_URL").ok(),
            webhook_secret: std::env::var("TELEGRAM_WEBHOOK_SECRET").ok(),
            session_ttl,
            sweep_interval,
        }
    }
}
