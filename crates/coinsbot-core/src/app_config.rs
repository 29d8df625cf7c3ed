use std::net::SocketAddr;
use std::time::Duration;

/// How platform updates reach the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Polling,
    Webhook,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Polling => write!(f, "polling"),
            RunMode::Webhook => write!(f, "webhook"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub aliexpress_app_key: String,
    pub aliexpress_app_secret: String,
    pub aliexpress_tracking_id: String,
    pub aliexpress_api_url: String,
    pub aliexpress_language: String,
    pub aliexpress_currency: String,
    pub run_mode: RunMode,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub listen_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,
    pub resolve_timeout_secs: u64,
    pub api_timeout_secs: u64,
    pub api_max_retries: u32,
    pub api_retry_backoff_ms: u64,
    pub affiliate_throttle_ms: u64,
    pub worker_pool_size: usize,
}

impl AppConfig {
    /// Webhook transport is only used when a public URL was configured;
    /// otherwise the bot falls back to long polling.
    #[must_use]
    pub fn effective_run_mode(&self) -> RunMode {
        match (self.run_mode, &self.webhook_url) {
            (RunMode::Webhook, Some(_)) => RunMode::Webhook,
            _ => RunMode::Polling,
        }
    }

    #[must_use]
    pub fn api_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.api_retry_backoff_ms)
    }

    #[must_use]
    pub fn affiliate_throttle(&self) -> Duration {
        Duration::from_millis(self.affiliate_throttle_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("telegram_bot_token", &"[redacted]")
            .field("aliexpress_app_key", &self.aliexpress_app_key)
            .field("aliexpress_app_secret", &"[redacted]")
            .field("aliexpress_tracking_id", &self.aliexpress_tracking_id)
            .field("aliexpress_api_url", &self.aliexpress_api_url)
            .field("aliexpress_language", &self.aliexpress_language)
            .field("aliexpress_currency", &self.aliexpress_currency)
            .field("run_mode", &self.run_mode)
            .field("webhook_url", &self.webhook_url)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("listen_addr", &self.listen_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("resolve_timeout_secs", &self.resolve_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("api_max_retries", &self.api_max_retries)
            .field("api_retry_backoff_ms", &self.api_retry_backoff_ms)
            .field("affiliate_throttle_ms", &self.affiliate_throttle_ms)
            .field("worker_pool_size", &self.worker_pool_size)
            .finish()
    }
}
