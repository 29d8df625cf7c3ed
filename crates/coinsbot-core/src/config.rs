use crate::app_config::{AppConfig, RunMode};
use crate::ConfigError;

const DEFAULT_API_URL: &str = "https://api-sg.aliexpress.com/sync";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; CoinsBot/1.0)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{Ipv4Addr, SocketAddr};

    // Empty values count as missing: a blank `TELEGRAM_BOT_TOKEN=` line in a
    // `.env` file is as unusable as no line at all.
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let telegram_bot_token = require("TELEGRAM_BOT_TOKEN")?;
    let aliexpress_app_key = require("ALIEXPRESS_API_PUBLIC")?;
    let aliexpress_app_secret = require("ALIEXPRESS_API_SECRET")?;
    let aliexpress_tracking_id = require("ALIEXPRESS_TRACKING_ID")?;

    let run_mode = parse_run_mode(&or_default("RUN_MODE", "polling"));
    let webhook_url = optional("WEBHOOK_URL");
    let webhook_secret = optional("WEBHOOK_SECRET");
    let port = parse_u16("PORT", "5000")?;
    let listen_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    let log_level = or_default("COINSBOT_LOG_LEVEL", "info");
    let aliexpress_api_url = or_default("ALIEXPRESS_API_URL", DEFAULT_API_URL);
    let aliexpress_language = or_default("ALIEXPRESS_LANGUAGE", "AR");
    let aliexpress_currency = or_default("ALIEXPRESS_CURRENCY", "USD");
    let user_agent = or_default("COINSBOT_USER_AGENT", DEFAULT_USER_AGENT);

    let resolve_timeout_secs = parse_u64("COINSBOT_RESOLVE_TIMEOUT_SECS", "10")?;
    let api_timeout_secs = parse_u64("COINSBOT_API_TIMEOUT_SECS", "30")?;
    let api_max_retries = parse_u32("COINSBOT_API_MAX_RETRIES", "2")?;
    let api_retry_backoff_ms = parse_u64("COINSBOT_API_RETRY_BACKOFF_MS", "1000")?;
    let affiliate_throttle_ms = parse_u64("COINSBOT_AFFILIATE_THROTTLE_MS", "800")?;
    let worker_pool_size = parse_usize("COINSBOT_WORKER_POOL_SIZE", "4")?;

    if worker_pool_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COINSBOT_WORKER_POOL_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        telegram_bot_token,
        aliexpress_app_key,
        aliexpress_app_secret,
        aliexpress_tracking_id,
        aliexpress_api_url,
        aliexpress_language,
        aliexpress_currency,
        run_mode,
        webhook_url,
        webhook_secret,
        listen_addr,
        log_level,
        user_agent,
        resolve_timeout_secs,
        api_timeout_secs,
        api_max_retries,
        api_retry_backoff_ms,
        affiliate_throttle_ms,
        worker_pool_size,
    })
}

/// Parse `RUN_MODE`. Only `webhook` (any case) selects the webhook
/// transport; every other value means polling.
fn parse_run_mode(s: &str) -> RunMode {
    if s.trim().eq_ignore_ascii_case("webhook") {
        RunMode::Webhook
    } else {
        RunMode::Polling
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
