//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by the cached client and the session store.
///
/// Every field has a default, so an empty environment yields a working
/// configuration pointed at the public API.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// `CATALOG_API_URL`, default `https://dummyjson.com`.
    pub api_url: String,
    /// `CATALOG_STALE_SECS`, default 30.
    pub stale_time: Duration,
    /// `CATALOG_GC_SECS`, default 300.
    pub gc_time: Duration,
    /// `CATALOG_RETRY_MAX`, default 1.
    pub max_retries: usize,
    /// `CATALOG_RETRY_DELAY_MS`, default 1000.
    pub retry_delay: Duration,
    /// `CATALOG_AUTH_FILE`, default `$HOME/.catalog-auth.json`.
    pub auth_file: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: "https://dummyjson.com".to_string(),
            stale_time: Duration::from_secs(30),
            gc_time: Duration::from_secs(300),
            max_retries: 1,
            retry_delay: Duration::from_millis(1000),
            auth_file: default_auth_file(),
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("CATALOG_API_URL").unwrap_or(defaults.api_url),
            stale_time: Duration::from_secs(env_u64(
                "CATALOG_STALE_SECS",
                defaults.stale_time.as_secs(),
            )),
            gc_time: Duration::from_secs(env_u64("CATALOG_GC_SECS", defaults.gc_time.as_secs())),
            max_retries: env_usize("CATALOG_RETRY_MAX", defaults.max_retries),
            retry_delay: Duration::from_millis(env_u64(
                "CATALOG_RETRY_DELAY_MS",
                defaults.retry_delay.as_millis() as u64,
            )),
            auth_file: std::env::var("CATALOG_AUTH_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.auth_file),
        }
    }
}

fn default_auth_file() -> PathBuf {
    let home = std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    home.join(".catalog-auth.json")
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_query_policy() {
        let cfg = CatalogConfig::default();
        assert_eq!(cfg.stale_time, Duration::from_secs(30));
        assert_eq!(cfg.gc_time, Duration::from_secs(300));
        assert_eq!(cfg.max_retries, 1);
        assert!(cfg.auth_file.ends_with(".catalog-auth.json"));
    }

    #[test]
    fn unparsable_numbers_fall_back() {
        assert_eq!(env_u64("CATALOG_TEST_SURELY_UNSET_VAR", 7), 7);
        assert_eq!(env_usize("CATALOG_TEST_SURELY_UNSET_VAR", 3), 3);
    }
}
