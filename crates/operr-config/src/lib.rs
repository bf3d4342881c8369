// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading, validation, and installation of process-wide
//! [`operr`] defaults.
//!
//! [`ErrorConfig`] holds the fallback code and message used when an error
//! chain does not supply its own. Configs are read from TOML, overridden from
//! the environment, merged, validated, and finally installed with
//! [`install`].
#![deny(unsafe_code)]
#![warn(missing_docs)]

use operr::{Defaults, ErrorCode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file could not be parsed as valid TOML.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The default code is not one of the well-known [`ErrorCode`]s.
    UnknownCode {
        /// The configured code.
        code: String,
    },
    /// An optional field is unset and its built-in value will be used.
    MissingOptionalField {
        /// Name of the missing field.
        field: String,
        /// What happens instead.
        hint: String,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::UnknownCode { code } => {
                write!(f, "default code '{code}' is not a well-known code")
            }
            ConfigWarning::MissingOptionalField { field, hint } => {
                write!(f, "missing optional field '{field}': {hint}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Fallback values for error resolution.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ErrorConfig {
    /// Code used when no error in a chain carries one (built-in: `internal`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_code: Option<String>,

    /// Message used when no error in a chain carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_message: Option<String>,
}

impl ErrorConfig {
    /// Resolve into [`Defaults`], filling unset fields with the built-ins.
    pub fn to_defaults(&self) -> Defaults {
        let builtin = Defaults::default();
        Defaults {
            code: self.default_code.clone().unwrap_or(builtin.code),
            message: self.default_message.clone().unwrap_or(builtin.message),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Environment variable overriding [`ErrorConfig::default_code`].
pub const ENV_DEFAULT_CODE: &str = "OPERR_DEFAULT_CODE";

/// Environment variable overriding [`ErrorConfig::default_message`].
pub const ENV_DEFAULT_MESSAGE: &str = "OPERR_DEFAULT_MESSAGE";

/// Load an [`ErrorConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, starts from [`ErrorConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<ErrorConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)?
        }
        None => ErrorConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML string into an [`ErrorConfig`].
pub fn parse_toml(content: &str) -> Result<ErrorConfig, ConfigError> {
    toml::from_str::<ErrorConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `OPERR_DEFAULT_CODE`
/// - `OPERR_DEFAULT_MESSAGE`
pub fn apply_env_overrides(config: &mut ErrorConfig) {
    if let Ok(val) = std::env::var(ENV_DEFAULT_CODE) {
        config.default_code = Some(val);
    }
    if let Ok(val) = std::env::var(ENV_DEFAULT_MESSAGE) {
        config.default_message = Some(val);
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a configuration, returning advisory warnings.
///
/// An empty default code or a blank default message is a hard error; a code
/// outside the well-known set and unset fields come back as warnings.
pub fn validate_config(config: &ErrorConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    match config.default_code.as_deref() {
        Some(code) if code.trim().is_empty() => {
            errors.push("default_code must not be empty".into());
        }
        Some(code) if code.parse::<ErrorCode>().is_err() => {
            warnings.push(ConfigWarning::UnknownCode { code: code.into() });
        }
        Some(_) => {}
        None => warnings.push(ConfigWarning::MissingOptionalField {
            field: "default_code".into(),
            hint: format!("falls back to '{}'", ErrorCode::Internal),
        }),
    }

    match config.default_message.as_deref() {
        Some(message) if message.trim().is_empty() => {
            errors.push("default_message must not be blank".into());
        }
        Some(_) => {}
        None => warnings.push(ConfigWarning::MissingOptionalField {
            field: "default_message".into(),
            hint: format!("falls back to \"{}\"", operr::DEFAULT_MESSAGE),
        }),
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations. Values in `overlay` take precedence over `base`.
pub fn merge_configs(base: ErrorConfig, overlay: ErrorConfig) -> ErrorConfig {
    ErrorConfig {
        default_code: overlay.default_code.or(base.default_code),
        default_message: overlay.default_message.or(base.default_message),
    }
}

// ---------------------------------------------------------------------------
// Installation
// ---------------------------------------------------------------------------

/// Validate `config` and make it the process-wide defaults.
///
/// Nothing is installed when validation fails.
pub fn install(config: &ErrorConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let warnings = validate_config(config)?;
    for warning in &warnings {
        tracing::warn!(target: "operr.config", %warning, "config warning");
    }
    let defaults = config.to_defaults();
    tracing::info!(
        target: "operr.config",
        code = %defaults.code,
        message = %defaults.message,
        "installing error defaults"
    );
    operr::set_global_defaults(defaults);
    Ok(warnings)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
