//! Reporter configuration resolved from explicit options with
//! environment-variable fallback.
//!
//! Resolution happens once at adapter construction and produces an
//! immutable [`Config`]; nothing else in the crate reads the process
//! environment for configuration. Malformed values degrade to defaults with
//! a warning; configuration can never make the reporter fail.

use std::env;

use tracing::warn;

/// Default values used when neither an explicit option nor an environment
/// variable provides one.
pub mod defaults {
    pub const PROJECT_ID: &str = "unknown-project";
    pub const BASE_URL: &str = "http://localhost:8080";
    pub const TIMEOUT_MS: u64 = 30_000;
    pub const MAX_RETRIES: u32 = 3;
    pub const RETRY_DELAY_MS: u64 = 1_000;
}

/// Explicit reporter options. Any field left `None` falls back to its
/// environment variable, then to the default.
#[derive(Debug, Clone, Default)]
pub struct ReporterOptions {
    /// Project identifier (`TRR_PROJECT_ID`)
    pub project_id: Option<String>,
    /// Project display name (`TRR_PROJECT_NAME`; defaults to the id)
    pub project_name: Option<String>,
    /// Collection server base URL (`TRR_BASE_URL`)
    pub base_url: Option<String>,
    /// Request timeout in milliseconds (`TRR_TIMEOUT_MS`)
    pub timeout_ms: Option<u64>,
    /// Maximum delivery attempts (`TRR_MAX_RETRIES`)
    pub max_retries: Option<u32>,
    /// Base delay between attempts in milliseconds (`TRR_RETRY_DELAY_MS`)
    pub retry_delay_ms: Option<u64>,
    /// Reporting enabled (`TRR_ENABLED`; explicit `false` on either side
    /// disables all reporting)
    pub enabled: Option<bool>,
    /// Re-raise delivery failures instead of swallowing them
    /// (`TRR_FAIL_ON_ERROR`)
    pub fail_on_error: Option<bool>,
}

/// Resolved reporter configuration, read-only after construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: String,
    pub project_name: String,
    pub base_url: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub enabled: bool,
    pub fail_on_error: bool,
}

impl Config {
    /// Resolve configuration from explicit options with environment
    /// fallback.
    ///
    /// Environment variables:
    /// - `TRR_PROJECT_ID`: project identifier (default: "unknown-project")
    /// - `TRR_PROJECT_NAME`: display name (default: the project id)
    /// - `TRR_BASE_URL`: server base URL (default: http://localhost:8080)
    /// - `TRR_TIMEOUT_MS`: request timeout in ms (default: 30000)
    /// - `TRR_MAX_RETRIES`: maximum delivery attempts (default: 3)
    /// - `TRR_RETRY_DELAY_MS`: base retry delay in ms (default: 1000)
    /// - `TRR_ENABLED`: set to "false" to disable reporting (default: true)
    /// - `TRR_FAIL_ON_ERROR`: set to "true" to re-raise delivery failures
    ///   (default: false)
    pub fn resolve(options: &ReporterOptions) -> Self {
        Self::resolve_with(options, |key| env::var(key).ok())
    }

    /// Resolution over an injected lookup, so precedence is testable without
    /// touching the process environment.
    fn resolve_with<F>(options: &ReporterOptions, get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = options
            .project_id
            .clone()
            .or_else(|| get("TRR_PROJECT_ID"))
            .unwrap_or_else(|| defaults::PROJECT_ID.to_string());

        let project_name = options
            .project_name
            .clone()
            .or_else(|| get("TRR_PROJECT_NAME"))
            .unwrap_or_else(|| project_id.clone());

        let base_url = options
            .base_url
            .clone()
            .or_else(|| get("TRR_BASE_URL"))
            .unwrap_or_else(|| defaults::BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_ms = options
            .timeout_ms
            .or_else(|| parse_number(&get, "TRR_TIMEOUT_MS"))
            .unwrap_or(defaults::TIMEOUT_MS);

        let max_retries = options
            .max_retries
            .or_else(|| parse_number(&get, "TRR_MAX_RETRIES"))
            .unwrap_or(defaults::MAX_RETRIES)
            .max(1);

        let retry_delay_ms = options
            .retry_delay_ms
            .or_else(|| parse_number(&get, "TRR_RETRY_DELAY_MS"))
            .unwrap_or(defaults::RETRY_DELAY_MS);

        // Explicit false on either the option or its env counterpart
        // disables all reporting.
        let enabled = options.enabled.unwrap_or(true)
            && parse_bool(&get, "TRR_ENABLED").unwrap_or(true);

        let fail_on_error = options
            .fail_on_error
            .or_else(|| parse_bool(&get, "TRR_FAIL_ON_ERROR"))
            .unwrap_or(false);

        Config {
            project_id,
            project_name,
            base_url,
            timeout_ms,
            max_retries,
            retry_delay_ms,
            enabled,
            fail_on_error,
        }
    }
}

/// Parse a numeric variable; malformed values degrade to `None` with a
/// warning.
fn parse_number<F, N>(get: &F, key: &str) -> Option<N>
where
    F: Fn(&str) -> Option<String>,
    N: std::str::FromStr,
{
    let raw = get(key)?;
    match raw.parse::<N>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{} has non-numeric value '{}', using default", key, raw);
            None
        }
    }
}

/// Parse a boolean variable; accepts true/false/1/0 in any case, anything
/// else degrades to `None` with a warning.
fn parse_bool<F>(get: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = get(key)?;
    match raw.to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => {
            warn!("{} has non-boolean value '{}', using default", key, raw);
            None
        }
    }
}
