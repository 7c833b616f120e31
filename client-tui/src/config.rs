//! Runtime configuration for goreview.
//!
//! Every value has a compile-time default and can be overridden through an
//! environment variable. Command-line flags in `main` take precedence over
//! both.

use std::path::PathBuf;
use std::time::Duration;

/// Default server the reviews are fetched from.
const DEFAULT_HOST: &str = "https://online-go.com";

/// Default path prefix of the REST endpoints.
const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Engine requested when a game has no review yet.
const DEFAULT_ENGINE: &str = "leela_zero";

/// Default interval of the background refresh (in seconds). `0` disables it.
const DEFAULT_REFRESH_SECS: u64 = 30;

/// Default directory for the rolling log files.
const DEFAULT_LOG_DIR: &str = "logs";

/// Default color theme.
const DEFAULT_THEME: &str = "dark";

/// Get the review server host.
///
/// Priority:
/// 1. `GOREVIEW_HOST` env variable if set
/// 2. `https://online-go.com` as fallback
pub fn get_host() -> String {
    std::env::var("GOREVIEW_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

/// Get the REST path prefix.
///
/// Priority:
/// 1. `GOREVIEW_API_PREFIX` env variable if set
/// 2. `/api/v1` as fallback
pub fn get_api_prefix() -> String {
    std::env::var("GOREVIEW_API_PREFIX").unwrap_or_else(|_| DEFAULT_API_PREFIX.to_string())
}

/// Get the engine used for new review requests.
///
/// Priority:
/// 1. `GOREVIEW_ENGINE` env variable if set
/// 2. `leela_zero` as fallback
pub fn get_engine() -> String {
    std::env::var("GOREVIEW_ENGINE").unwrap_or_else(|_| DEFAULT_ENGINE.to_string())
}

/// Get the background refresh interval, `None` when disabled.
///
/// Priority:
/// 1. `GOREVIEW_REFRESH_SECS` env variable if set (falls back to default
///    if the value cannot be parsed as a `u64`)
/// 2. `30` seconds as fallback
pub fn get_refresh_interval() -> Option<Duration> {
    let secs = match std::env::var("GOREVIEW_REFRESH_SECS") {
        Ok(value) => value.parse().unwrap_or(DEFAULT_REFRESH_SECS),
        Err(_) => DEFAULT_REFRESH_SECS,
    };
    refresh_interval(secs)
}

/// Refresh period for `secs` seconds; zero disables the refresh.
pub fn refresh_interval(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Get the log directory.
///
/// Priority:
/// 1. `GOREVIEW_LOG_DIR` env variable if set
/// 2. `logs` in the working directory as fallback
pub fn get_log_dir() -> PathBuf {
    if let Ok(path) = std::env::var("GOREVIEW_LOG_DIR") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_LOG_DIR)
}

/// Get the theme name (`dark` or `light`).
///
/// Priority:
/// 1. `GOREVIEW_THEME` env variable if set
/// 2. `dark` as fallback
pub fn get_theme() -> String {
    std::env::var("GOREVIEW_THEME").unwrap_or_else(|_| DEFAULT_THEME.to_string())
}

/// Get the API token used to authenticate review requests, if any.
///
/// Only read from `GOREVIEW_API_TOKEN`; there is no default.
pub fn get_api_token() -> Option<String> {
    std::env::var("GOREVIEW_API_TOKEN")
        .ok()
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_host() {
        let host = get_host();
        match std::env::var("GOREVIEW_HOST") {
            Ok(val) => assert_eq!(host, val),
            Err(_) => assert_eq!(host, DEFAULT_HOST),
        }
    }

    #[test]
    fn test_get_api_prefix() {
        let prefix = get_api_prefix();
        match std::env::var("GOREVIEW_API_PREFIX") {
            Ok(val) => assert_eq!(prefix, val),
            Err(_) => assert_eq!(prefix, DEFAULT_API_PREFIX),
        }
    }

    #[test]
    fn test_get_engine() {
        let engine = get_engine();
        match std::env::var("GOREVIEW_ENGINE") {
            Ok(val) => assert_eq!(engine, val),
            Err(_) => assert_eq!(engine, DEFAULT_ENGINE),
        }
    }

    #[test]
    fn test_get_log_dir() {
        let dir = get_log_dir();
        match std::env::var("GOREVIEW_LOG_DIR") {
            Ok(val) => assert_eq!(dir, PathBuf::from(val)),
            Err(_) => assert_eq!(dir, PathBuf::from(DEFAULT_LOG_DIR)),
        }
    }

    #[test]
    fn test_refresh_interval_zero_disables() {
        assert_eq!(refresh_interval(0), None);
        assert_eq!(refresh_interval(5), Some(Duration::from_secs(5)));
    }
}
