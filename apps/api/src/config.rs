use anyhow::{Context, Result};

const DEFAULT_DRAFT_TTL_SECS: u64 = 30 * 24 * 60 * 60;
const DEFAULT_MAX_BATCH: usize = 20;
/// Hard ceiling for `MAX_BATCH`, whatever the environment says.
const MAX_BATCH_CEILING: usize = 100;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Draft store backend. `None` keeps drafts in process memory.
    pub redis_url: Option<String>,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub draft_ttl_secs: u64,
    /// Upper bound on messages produced by one resolve/generate request.
    pub max_batch: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            draft_ttl_secs: parse_env("DRAFT_TTL_SECS", DEFAULT_DRAFT_TTL_SECS)?,
            max_batch: clamp_batch(parse_env("MAX_BATCH", DEFAULT_MAX_BATCH)?),
        })
    }
}

fn clamp_batch(raw: usize) -> usize {
    raw.clamp(1, MAX_BATCH_CEILING)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests: memory store, small batches.
    pub fn for_tests() -> Self {
        Config {
            redis_url: None,
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            draft_ttl_secs: DEFAULT_DRAFT_TTL_SECS,
            max_batch: 5,
        }
    }
}
