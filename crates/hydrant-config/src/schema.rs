//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use hydrant_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// API description settings.
///
/// # Example
///
/// ```
/// use hydrant_config::ApiConfig;
///
/// let config = ApiConfig {
///     base_uri: Some("https://api.shop.test".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(config.documentation_segment, "documentation");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Absolute base IRI of descriptions. Unset means the scheme and
    /// authority of each request.
    #[serde(default)]
    pub base_uri: Option<String>,

    /// Path segment of the per-controller description endpoint.
    #[serde(default = "default_documentation_segment")]
    pub documentation_segment: String,

    /// Title of emitted API documentation.
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_uri: None,
            documentation_segment: default_documentation_segment(),
            title: None,
        }
    }
}

fn default_documentation_segment() -> String {
    "documentation".to_string()
}

/// Content negotiation settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NegotiationConfig {
    /// Reject an explicit `Accept` without `*/*` that names no registered
    /// media type with `406 Not Acceptable`.
    #[serde(default)]
    pub strict_accept: bool,
}

/// Cross-origin settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Preflight cache lifetime in seconds; `0` omits `Access-Control-Max-Age`.
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,

    /// Request headers allowed on cross-origin requests.
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            max_age_secs: default_max_age(),
            allowed_headers: default_allowed_headers(),
        }
    }
}

impl CorsConfig {
    /// Whether any origin is allowed.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_age() -> u64 {
    86400
}

fn default_allowed_headers() -> Vec<String> {
    ["accept", "authorization", "content-type"]
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (`info`, `hydrant_server=debug,warn`, ...).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// The subscriber settings for [`hydrant_telemetry::init_logging`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            file_line_info: self.include_location,
            ..LogConfig::default()
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_default() {
        let config = ApiConfig::default();
        assert!(config.base_uri.is_none());
        assert_eq!(config.documentation_segment, "documentation");
    }

    #[test]
    fn test_cors_config_default() {
        let config = CorsConfig::default();
        assert!(config.allows_any_origin());
        assert_eq!(config.max_age_secs, 86400);
        assert!(config.allowed_headers.contains(&"content-type".to_string()));
    }

    #[test]
    fn test_cors_listed_origins() {
        let config = CorsConfig {
            allowed_origins: vec!["https://shop.test".to_string()],
            ..Default::default()
        };
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_logging_to_log_config() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..Default::default()
        };
        let log = config.to_log_config();
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Pretty);
        assert!(log.file_line_info);
    }

    #[test]
    fn test_section_rejects_unknown_fields() {
        let result: Result<NegotiationConfig, _> = serde_json::from_str(r#"{"strict": true}"#);
        assert!(result.is_err());
    }
}
