//! Typed configuration system for Hydrant.
//!
//! This crate provides a strongly-typed configuration for Hydrant dispatchers
//! with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! The configuration system is built around the [`HydrantConfig`] struct:
//!
//! - [`ApiConfig`] - description base IRI, documentation segment and title
//! - [`NegotiationConfig`] - `Accept` handling
//! - [`CorsConfig`] - allowed origins and headers, preflight caching
//! - [`LoggingConfig`] - log level and format
//!
//! # Example
//!
//! ```no_run
//! use hydrant_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hydrant_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("hydrant.toml")?
//!     .with_env()
//!     .load()?;
//!
//! println!("Descriptions under: {}", config.api.documentation_segment);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_uri = "https://api.shop.test"
//! documentation_segment = "documentation"
//! title = "Shop"
//!
//! [negotiation]
//! strict_accept = false
//!
//! [cors]
//! allowed_origins = ["*"]
//! max_age_secs = 86400
//! allowed_headers = ["accept", "authorization", "content-type"]
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! All configuration values can be overridden via environment variables using
//! the format `PREFIX__SECTION__KEY`. For example:
//!
//! - `HYDRANT__API__BASE_URI=https://api.shop.test`
//! - `HYDRANT__NEGOTIATION__STRICT_ACCEPT=true`
//! - `HYDRANT__CORS__ALLOWED_ORIGINS=https://a.test,https://b.test`
//! - `HYDRANT__LOGGING__LEVEL=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{HydrantConfig, HydrantConfigBuilder};
pub use error::ConfigError;
pub use hydrant_telemetry::LogFormat;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{ApiConfig, CorsConfig, LoggingConfig, NegotiationConfig};
