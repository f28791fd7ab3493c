//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit flag, then environment variable,
//! then built-in default.

use meteo_alerts::Strategy;

pub const DEFAULT_FEED_URL: &str = "https://apiprevmet3.inmet.gov.br/avisos/rss";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

pub const ENV_FEED_URL: &str = "METEO_ALERTS_URL";
pub const ENV_TIMEOUT_MS: &str = "METEO_ALERTS_TIMEOUT_MS";
pub const ENV_STRATEGY: &str = "METEO_ALERTS_STRATEGY";

/// Resolve the feed URL.
pub fn resolve_feed_url(explicit: Option<&str>) -> String {
    resolve_feed_url_from(explicit, std::env::var(ENV_FEED_URL).ok())
}

/// Resolve the HTTP timeout in milliseconds. Unparseable env values fall back
/// to the default.
pub fn resolve_timeout_ms(explicit: Option<u64>) -> u64 {
    resolve_timeout_ms_from(explicit, std::env::var(ENV_TIMEOUT_MS).ok())
}

/// Resolve the extraction strategy.
pub fn resolve_strategy(explicit: Option<&str>) -> anyhow::Result<Strategy> {
    resolve_strategy_from(explicit, std::env::var(ENV_STRATEGY).ok())
}

fn resolve_feed_url_from(explicit: Option<&str>, env: Option<String>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }
    env.filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FEED_URL.to_string())
}

fn resolve_timeout_ms_from(explicit: Option<u64>, env: Option<String>) -> u64 {
    explicit
        .or_else(|| env.and_then(|v| v.trim().parse().ok()))
        .unwrap_or(DEFAULT_TIMEOUT_MS)
}

fn resolve_strategy_from(explicit: Option<&str>, env: Option<String>) -> anyhow::Result<Strategy> {
    match explicit.map(str::to_string).or(env) {
        Some(value) => value.parse().map_err(anyhow::Error::msg),
        None => Ok(Strategy::default()),
    }
}
