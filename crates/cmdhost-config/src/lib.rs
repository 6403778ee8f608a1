// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error-reporting configuration for the cmdhost engine.
//!
//! This crate provides [`ReportConfig`], which controls how structured errors
//! are logged and rendered, together with helpers for loading from TOML files,
//! applying environment overrides, merging overlays, and producing advisory
//! [`ConfigWarning`]s.
#![deny(unsafe_code)]
#![warn(missing_docs)]

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

/// Advisory-level issues that do not prevent operation but deserve attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A recommended optional field is missing.
    MissingOptionalField {
        /// Name of the missing field.
        field: String,
        /// Why it matters.
        hint: String,
    },
    /// A setting has no effect given the rest of the configuration.
    IneffectiveSetting {
        /// Name of the field.
        field: String,
        /// Why it has no effect.
        hint: String,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::MissingOptionalField { field, hint } => {
                write!(f, "missing optional field '{field}': {hint}")
            }
            ConfigWarning::IneffectiveSetting { field, hint } => {
                write!(f, "setting '{field}' has no effect: {hint}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// How a reported error is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Message followed by indented detail lines.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

/// Error-reporting settings.
///
/// Every field is optional so overlays can be merged; the accessor methods
/// supply defaults.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ReportConfig {
    /// Log level for the `cmdhost` targets (e.g. `"debug"`, `"info"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Rendering of reported errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ReportFormat>,

    /// Whether reports list the cause chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_causes: Option<bool>,

    /// Maximum number of causes listed in a report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cause_depth: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".into()),
            format: None,
            include_causes: None,
            max_cause_depth: None,
        }
    }
}

impl ReportConfig {
    /// Effective log level.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Effective report format.
    pub fn format(&self) -> ReportFormat {
        self.format.unwrap_or_default()
    }

    /// Effective cause-listing switch.
    pub fn include_causes(&self) -> bool {
        self.include_causes.unwrap_or(true)
    }

    /// Effective cause depth limit.
    pub fn max_cause_depth(&self) -> usize {
        self.max_cause_depth.unwrap_or(DEFAULT_CAUSE_DEPTH)
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Causes listed when no depth is configured.
pub const DEFAULT_CAUSE_DEPTH: usize = 8;

/// Largest accepted `max_cause_depth`.
pub const MAX_CAUSE_DEPTH: usize = 64;

/// Recognised log levels.
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`ReportConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`ReportConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<ReportConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)?
        }
        None => ReportConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a TOML string into a [`ReportConfig`].
pub fn parse_toml(content: &str) -> Result<ReportConfig, ConfigError> {
    toml::from_str::<ReportConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `CMDHOST_LOG_LEVEL`
/// - `CMDHOST_REPORT_FORMAT` (`text` or `json`; other values are ignored)
pub fn apply_env_overrides(config: &mut ReportConfig) {
    apply_overrides_with(config, |key| std::env::var(key).ok());
}

/// Apply overrides read through `lookup` instead of the process environment.
pub fn apply_overrides_with(config: &mut ReportConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("CMDHOST_LOG_LEVEL") {
        config.log_level = Some(val);
    }
    if let Some(format) = lookup("CMDHOST_REPORT_FORMAT").and_then(|v| v.parse().ok()) {
        config.format = Some(format);
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// Hard errors (unknown log levels, out-of-range depths) are returned as a
/// [`ConfigError::ValidationError`]; soft issues come back as warnings.
pub fn validate_config(config: &ReportConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    match config.log_level {
        Some(ref level) if !VALID_LOG_LEVELS.contains(&level.as_str()) => {
            errors.push(format!("invalid log_level '{level}'"));
        }
        Some(_) => {}
        None => warnings.push(ConfigWarning::MissingOptionalField {
            field: "log_level".into(),
            hint: "falls back to 'info'".into(),
        }),
    }

    if let Some(depth) = config.max_cause_depth {
        if depth > MAX_CAUSE_DEPTH {
            errors.push(format!(
                "max_cause_depth {depth} out of range (0..={MAX_CAUSE_DEPTH})"
            ));
        } else if depth == 0 && config.include_causes() {
            warnings.push(ConfigWarning::IneffectiveSetting {
                field: "include_causes".into(),
                hint: "max_cause_depth is 0, no causes will be listed".into(),
            });
        }
    }

    if config.include_causes == Some(false) && config.max_cause_depth.is_some() {
        warnings.push(ConfigWarning::IneffectiveSetting {
            field: "max_cause_depth".into(),
            hint: "include_causes is false".into(),
        });
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

/// Merge two configurations.  Values in `overlay` take precedence over `base`.
pub fn merge_configs(base: ReportConfig, overlay: ReportConfig) -> ReportConfig {
    ReportConfig {
        log_level: overlay.log_level.or(base.log_level),
        format: overlay.format.or(base.format),
        include_causes: overlay.include_causes.or(base.include_causes),
        max_cause_depth: overlay.max_cause_depth.or(base.max_cause_depth),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
