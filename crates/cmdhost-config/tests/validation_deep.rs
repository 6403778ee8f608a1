// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deep validation tests for `cmdhost-config`.

use cmdhost_config::{
    ConfigError, ConfigWarning, MAX_CAUSE_DEPTH, ReportConfig, ReportFormat, merge_configs,
    parse_toml, validate_config,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fully-specified config with no validation warnings.
fn fully_valid_config() -> ReportConfig {
    ReportConfig {
        log_level: Some("debug".into()),
        format: Some(ReportFormat::Json),
        include_causes: Some(true),
        max_cause_depth: Some(4),
    }
}

/// Extract error reasons from a `ConfigError::ValidationError`.
fn validation_reasons(err: ConfigError) -> Vec<String> {
    match err {
        ConfigError::ValidationError { reasons } => reasons,
        other => panic!("expected ValidationError, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn fully_valid_config_has_no_warnings() {
    assert!(validate_config(&fully_valid_config()).unwrap().is_empty());
}

#[test]
fn every_recognised_level_validates() {
    for level in ["error", "warn", "info", "debug", "trace"] {
        let cfg = ReportConfig {
            log_level: Some(level.into()),
            ..fully_valid_config()
        };
        assert!(validate_config(&cfg).is_ok(), "{level} should be valid");
    }
}

#[test]
fn levels_are_case_sensitive() {
    let cfg = ReportConfig {
        log_level: Some("DEBUG".into()),
        ..fully_valid_config()
    };
    let reasons = validation_reasons(validate_config(&cfg).unwrap_err());
    assert_eq!(reasons, ["invalid log_level 'DEBUG'"]);
}

#[test]
fn multiple_problems_are_all_reported() {
    let cfg = ReportConfig {
        log_level: Some("loud".into()),
        max_cause_depth: Some(MAX_CAUSE_DEPTH * 2),
        ..fully_valid_config()
    };
    let reasons = validation_reasons(validate_config(&cfg).unwrap_err());
    assert_eq!(reasons.len(), 2);
}

#[test]
fn depth_at_limit_is_accepted() {
    let cfg = ReportConfig {
        max_cause_depth: Some(MAX_CAUSE_DEPTH),
        ..fully_valid_config()
    };
    assert!(validate_config(&cfg).unwrap().is_empty());
}

#[test]
fn merging_defaults_keeps_base() {
    let merged = merge_configs(fully_valid_config(), parse_toml("").unwrap());
    assert_eq!(merged, fully_valid_config());
}

#[test]
fn warning_display_mentions_field() {
    let w = ConfigWarning::MissingOptionalField {
        field: "log_level".into(),
        hint: "falls back to 'info'".into(),
    };
    assert!(w.to_string().contains("log_level"));
}

#[test]
fn schema_lists_every_field() {
    let schema = schemars::schema_for!(ReportConfig);
    let json = serde_json::to_value(&schema).unwrap();
    let props = json["properties"].as_object().unwrap();
    for field in ["log_level", "format", "include_causes", "max_cause_depth"] {
        assert!(props.contains_key(field), "schema missing {field}");
    }
}
