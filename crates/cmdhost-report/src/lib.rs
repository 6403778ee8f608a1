// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rendering and logging of structured cmdhost errors.
//!
//! A reporting layer needs three things from a failure: the message, the
//! identifier and category from its [`ErrorRecord`](cmdhost_error::ErrorRecord),
//! and the cause chain for root-cause diagnosis. [`build_report`] collects
//! them into an [`ErrorReport`]; [`render`] turns that into text or JSON and
//! [`report`] additionally logs it on the `cmdhost.report` target.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use cmdhost_config::{ReportConfig, ReportFormat};
use cmdhost_error::{ContainsErrorRecord, ErrorCategory};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing_subscriber::EnvFilter;

/// Everything a reporting layer shows for one error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorReport {
    /// Fully qualified error identifier.
    pub error_id: String,
    /// Failure category.
    pub category: ErrorCategory,
    /// Displayed message of the error.
    pub message: String,
    /// Rendered [`CategoryInfo`](cmdhost_error::CategoryInfo).
    pub category_info: String,
    /// Target object, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_object: Option<serde_json::Value>,
    /// Messages of the cause chain, nearest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

/// Collect the report for `err`.
///
/// Causes are listed only when `config.include_causes()` is set, and at most
/// `config.max_cause_depth()` of them.
pub fn build_report<E>(err: &E, config: &ReportConfig) -> ErrorReport
where
    E: ContainsErrorRecord + ?Sized,
{
    let record = err.error_record();
    let causes = if config.include_causes() {
        std::iter::successors(err.source(), |e| e.source())
            .take(config.max_cause_depth())
            .map(|e| e.to_string())
            .collect()
    } else {
        Vec::new()
    };
    ErrorReport {
        error_id: record.fully_qualified_error_id().to_owned(),
        category: record.category(),
        message: err.to_string(),
        category_info: record.category_info().to_string(),
        target_object: record.target_object().cloned(),
        causes,
    }
}

/// Render a report in the requested format.
pub fn render(report: &ErrorReport, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => render_text(report),
        ReportFormat::Json => {
            serde_json::to_string(report).unwrap_or_else(|_| render_text(report))
        }
    }
}

fn render_text(report: &ErrorReport) -> String {
    let mut out = report.message.clone();
    let _ = write!(
        out,
        "\n    + CategoryInfo          : {}",
        report.category_info
    );
    let _ = write!(out, "\n    + FullyQualifiedErrorId : {}", report.error_id);
    for cause in &report.causes {
        let _ = write!(out, "\n    + CausedBy              : {cause}");
    }
    out
}

/// Build, log, and render the report for `err`.
///
/// The error is logged at `error` level on the `cmdhost.report` target with
/// its identifier and category as fields.
pub fn report<E>(err: &E, config: &ReportConfig) -> String
where
    E: ContainsErrorRecord + ?Sized,
{
    let report = build_report(err, config);
    tracing::error!(
        target: "cmdhost.report",
        error_id = %report.error_id,
        category = %report.category,
        causes = report.causes.len(),
        "{}",
        report.message
    );
    render(&report, config.format())
}

/// Filter enabling the `cmdhost` targets at the configured level.
pub fn env_filter(config: &ReportConfig) -> EnvFilter {
    EnvFilter::new(format!("cmdhost={}", config.log_level()))
}

/// Install a global fmt subscriber for the `cmdhost` targets.
///
/// JSON log lines are used when the report format is JSON. Returns `false`
/// if a global subscriber was already installed.
pub fn init_tracing(config: &ReportConfig) -> bool {
    let filter = env_filter(config);
    match config.format() {
        ReportFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok(),
        ReportFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .is_ok(),
    }
}
