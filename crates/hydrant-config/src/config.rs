//! Main configuration types.
//!
//! This module provides the top-level [`HydrantConfig`] struct and its builder.

use http::header::HeaderName;
use http::Uri;
use serde::{Deserialize, Serialize};

use crate::{ApiConfig, ConfigError, CorsConfig, LoggingConfig, NegotiationConfig};

/// Complete Hydrant configuration.
///
/// This is the root configuration type that contains all configuration sections.
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use hydrant_config::HydrantConfig;
///
/// let config = HydrantConfig::default();
/// assert_eq!(config.api.documentation_segment, "documentation");
/// assert!(!config.negotiation.strict_accept);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HydrantConfig {
    /// API description configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Content negotiation configuration.
    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// Cross-origin configuration.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HydrantConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use hydrant_config::{ApiConfig, HydrantConfig};
    ///
    /// let config = HydrantConfig::builder()
    ///     .api(ApiConfig {
    ///         base_uri: Some("https://api.shop.test".to_string()),
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.api.base_uri.as_deref(), Some("https://api.shop.test"));
    /// ```
    #[must_use]
    pub fn builder() -> HydrantConfigBuilder {
        HydrantConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `api.base_uri` is not an absolute `http(s)` URI
    /// - `api.documentation_segment` is empty or contains `/`
    /// - `cors.allowed_origins` contains an empty entry
    /// - `cors.allowed_headers` contains an invalid header name
    /// - `logging.level` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_uri) = &self.api.base_uri {
            let uri: Uri = base_uri
                .parse()
                .map_err(|_| ConfigError::invalid_value("api.base_uri", format!("invalid URI: {base_uri}")))?;
            if !matches!(uri.scheme_str(), Some("http" | "https")) || uri.authority().is_none() {
                return Err(ConfigError::invalid_value(
                    "api.base_uri",
                    format!("must be an absolute http(s) URI: {base_uri}"),
                ));
            }
        }

        let segment = &self.api.documentation_segment;
        if segment.is_empty() || segment.contains('/') {
            return Err(ConfigError::invalid_value(
                "api.documentation_segment",
                "must be a single non-empty path segment",
            ));
        }

        if self.cors.allowed_origins.iter().any(|origin| origin.trim().is_empty()) {
            return Err(ConfigError::invalid_value(
                "cors.allowed_origins",
                "origins must not be empty",
            ));
        }

        if let Some(header) = self
            .cors
            .allowed_headers
            .iter()
            .find(|header| HeaderName::from_bytes(header.as_bytes()).is_err())
        {
            return Err(ConfigError::invalid_value(
                "cors.allowed_headers",
                format!("invalid header name: {header}"),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// This preset is optimized for local development with:
    /// - Pretty log formatting with source locations
    /// - Debug log level
    /// - Lenient `Accept` handling
    ///
    /// # Example
    ///
    /// ```
    /// use hydrant_config::HydrantConfig;
    ///
    /// let config = HydrantConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = hydrant_telemetry::LogFormat::Pretty;
        config.logging.include_location = true;

        config.negotiation.strict_accept = false;

        config
    }

    /// Create a production configuration preset.
    ///
    /// This preset is optimized for production with:
    /// - JSON log formatting
    /// - Info log level
    /// - Strict `Accept` handling
    ///
    /// # Example
    ///
    /// ```
    /// use hydrant_config::HydrantConfig;
    ///
    /// let config = HydrantConfig::production();
    /// assert_eq!(config.logging.format, hydrant_config::LogFormat::Json);
    /// assert!(config.negotiation.strict_accept);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = hydrant_telemetry::LogFormat::Json;
        config.logging.include_location = false;

        config.negotiation.strict_accept = true;

        config
    }
}

/// Builder for [`HydrantConfig`].
#[derive(Debug, Default)]
pub struct HydrantConfigBuilder {
    api: Option<ApiConfig>,
    negotiation: Option<NegotiationConfig>,
    cors: Option<CorsConfig>,
    logging: Option<LoggingConfig>,
}

impl HydrantConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API configuration.
    #[must_use]
    pub fn api(mut self, api: ApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    /// Set the negotiation configuration.
    #[must_use]
    pub fn negotiation(mut self, negotiation: NegotiationConfig) -> Self {
        self.negotiation = Some(negotiation);
        self
    }

    /// Set the CORS configuration.
    #[must_use]
    pub fn cors(mut self, cors: CorsConfig) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> HydrantConfig {
        HydrantConfig {
            api: self.api.unwrap_or_default(),
            negotiation: self.negotiation.unwrap_or_default(),
            cors: self.cors.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<HydrantConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
