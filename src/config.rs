//! TOML-based application configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::estimate::client::DEFAULT_USER_AGENT;
use crate::wizard::InputParameters;
use crate::wizard::steps::EFFICIENCY_RANGE;

/// Top-level configuration parsed from TOML.
///
/// All sections are optional and default to values that talk to a local
/// estimation service. Load with [`AppConfig::from_toml_file`] or use
/// [`AppConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Estimation service connection.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Initial wizard values.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Log filter and destination.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Estimation service connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Base URL; `/simulate` and `/dispatch` are appended.
    pub base_url: String,
    /// Per-request timeout in seconds (must be > 0).
    pub timeout_secs: u64,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Values the wizard starts with.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Site postcode.
    pub postcode: String,
    /// Array size (kWp).
    pub kwp: f64,
    /// Battery capacity (kWh).
    pub cap_kwh: f64,
    /// Battery power (kW).
    pub pow_kw: f64,
    /// Round-trip efficiency (0.5–1.0).
    pub eta: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let p = InputParameters::default();
        Self {
            postcode: p.postcode,
            kwp: p.array_kwp,
            cap_kwh: p.capacity_kwh,
            pow_kw: p.power_kw,
            eta: p.efficiency,
        }
    }
}

impl DefaultsConfig {
    pub fn to_params(&self) -> InputParameters {
        InputParameters {
            postcode: self.postcode.clone(),
            array_kwp: self.kwp,
            capacity_kwh: self.cap_kwh,
            power_kw: self.pow_kw,
            efficiency: self.eta,
        }
    }
}

/// Log filter and destination.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive, e.g. `"info"` or `"sunsave=debug"`.
    pub filter: String,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"service.base_url"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl AppConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let svc = &self.service;
        if svc.base_url.trim().is_empty() {
            errors.push(ConfigError::new("service.base_url", "must not be empty"));
        } else if !(svc.base_url.starts_with("http://") || svc.base_url.starts_with("https://")) {
            errors.push(ConfigError::new(
                "service.base_url",
                format!("must start with http:// or https://, got \"{}\"", svc.base_url),
            ));
        }
        if svc.timeout_secs == 0 {
            errors.push(ConfigError::new("service.timeout_secs", "must be > 0"));
        }

        let d = &self.defaults;
        for (field, value) in [
            ("defaults.kwp", d.kwp),
            ("defaults.cap_kwh", d.cap_kwh),
            ("defaults.pow_kw", d.pow_kw),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field, "must be > 0"));
            }
        }
        if !EFFICIENCY_RANGE.contains(&d.eta) {
            errors.push(ConfigError::new("defaults.eta", "must be in [0.5, 1.0]"));
        }

        if self.logging.filter.trim().is_empty() {
            errors.push(ConfigError::new("logging.filter", "must not be empty"));
        }

        errors
    }
}
