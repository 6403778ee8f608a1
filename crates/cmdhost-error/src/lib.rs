// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured error records for the cmdhost command-shell engine.
//!
//! Errors raised by the engine carry a stable string identifier and, on
//! demand, an [`ErrorRecord`] describing the failure for reporting layers:
//! the identifier, an [`ErrorCategory`], and an optional target object.
//!
//! The record is built lazily the first time a consumer asks for it through
//! [`ContainsErrorRecord::error_record`], so the common construct-and-propagate
//! path pays nothing for it.
//!
//! ```
//! use cmdhost_error::{ContainsErrorRecord, ErrorCategory, NotSupportedError};
//!
//! let err = NotSupportedError::new("pipelines cannot be nested here");
//! let record = err.error_record();
//! assert_eq!(record.fully_qualified_error_id(), "NotSupported");
//! assert_eq!(record.category_info().category, ErrorCategory::NotImplemented);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod argument;
mod fields;
mod not_supported;

pub use argument::ArgumentNullError;
pub use fields::{
    CLASS_NAME_FIELD, DeserializationError, ERROR_ID_FIELD, INNER_EXCEPTION_FIELD, MAX_CAUSE_DEPTH,
    MESSAGE_FIELD, SerializationInfo, SerializedError,
};
pub use not_supported::{DEFAULT_ERROR_ID, DEFAULT_MESSAGE, NotSupportedError};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// ErrorCategory
// ---------------------------------------------------------------------------

/// Fixed classification of the nature of a failure.
///
/// Serialises to the variant name (e.g. `"NotImplemented"`); the names are
/// stable and shared with every consumer of error records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ErrorCategory {
    /// No more specific category applies.
    NotSpecified,
    /// A resource could not be opened.
    OpenError,
    /// A resource could not be closed.
    CloseError,
    /// A device reported a failure.
    DeviceError,
    /// A deadlock was detected.
    DeadlockDetected,
    /// An argument was invalid.
    InvalidArgument,
    /// Input data was invalid.
    InvalidData,
    /// The operation is invalid in the current state.
    InvalidOperation,
    /// A result was invalid.
    InvalidResult,
    /// A value had the wrong type.
    InvalidType,
    /// Metadata was invalid or missing.
    MetadataError,
    /// The capability is not implemented or not supported.
    NotImplemented,
    /// A required component is not installed.
    NotInstalled,
    /// The target object could not be found.
    ObjectNotFound,
    /// The operation was stopped.
    OperationStopped,
    /// The operation timed out.
    OperationTimeout,
    /// Input was syntactically invalid.
    SyntaxError,
    /// The parser rejected the input.
    ParserError,
    /// Access was denied.
    PermissionDenied,
    /// The resource is busy.
    ResourceBusy,
    /// The resource already exists.
    ResourceExists,
    /// The resource is unavailable.
    ResourceUnavailable,
    /// Reading failed.
    ReadError,
    /// Writing failed.
    WriteError,
    /// A native command wrote to its error stream.
    FromStdErr,
    /// A security check failed.
    SecurityError,
    /// A protocol violation occurred.
    ProtocolError,
    /// A connection failed.
    ConnectionError,
    /// Authentication failed.
    AuthenticationError,
    /// A configured limit was exceeded.
    LimitsExceeded,
    /// A quota was exceeded.
    QuotaExceeded,
    /// The feature is not enabled.
    NotEnabled,
}

impl ErrorCategory {
    /// Stable `&'static str` representation (e.g. `"NotImplemented"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSpecified => "NotSpecified",
            Self::OpenError => "OpenError",
            Self::CloseError => "CloseError",
            Self::DeviceError => "DeviceError",
            Self::DeadlockDetected => "DeadlockDetected",
            Self::InvalidArgument => "InvalidArgument",
            Self::InvalidData => "InvalidData",
            Self::InvalidOperation => "InvalidOperation",
            Self::InvalidResult => "InvalidResult",
            Self::InvalidType => "InvalidType",
            Self::MetadataError => "MetadataError",
            Self::NotImplemented => "NotImplemented",
            Self::NotInstalled => "NotInstalled",
            Self::ObjectNotFound => "ObjectNotFound",
            Self::OperationStopped => "OperationStopped",
            Self::OperationTimeout => "OperationTimeout",
            Self::SyntaxError => "SyntaxError",
            Self::ParserError => "ParserError",
            Self::PermissionDenied => "PermissionDenied",
            Self::ResourceBusy => "ResourceBusy",
            Self::ResourceExists => "ResourceExists",
            Self::ResourceUnavailable => "ResourceUnavailable",
            Self::ReadError => "ReadError",
            Self::WriteError => "WriteError",
            Self::FromStdErr => "FromStdErr",
            Self::SecurityError => "SecurityError",
            Self::ProtocolError => "ProtocolError",
            Self::ConnectionError => "ConnectionError",
            Self::AuthenticationError => "AuthenticationError",
            Self::LimitsExceeded => "LimitsExceeded",
            Self::QuotaExceeded => "QuotaExceeded",
            Self::NotEnabled => "NotEnabled",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CategoryInfo
// ---------------------------------------------------------------------------

/// Category plus the contextual strings shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryInfo {
    /// The failure category.
    pub category: ErrorCategory,
    /// Name of the activity that failed, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    /// Short type name of the error that produced the record.
    pub reason: String,
    /// Rendered target object, or empty.
    pub target_name: String,
    /// Kind of the target object, or empty.
    pub target_type: String,
}

impl fmt::Display for CategoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ({}:{}) [{}], {}",
            self.category,
            self.target_name,
            self.target_type,
            self.activity.as_deref().unwrap_or(""),
            self.reason
        )
    }
}

// ---------------------------------------------------------------------------
// ErrorRecord
// ---------------------------------------------------------------------------

/// Structured diagnostic metadata attached to a failure.
///
/// Cloning is cheap: the exception is shared behind an [`Arc`].
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    exception: Arc<dyn Error + Send + Sync>,
    fully_qualified_error_id: String,
    category_info: CategoryInfo,
    target_object: Option<serde_json::Value>,
}

impl ErrorRecord {
    /// Build a record for `exception`.
    ///
    /// The category reason is the short type name of `E`, and the target
    /// name/type are derived from `target_object` when present.
    pub fn new<E>(
        exception: E,
        error_id: impl Into<String>,
        category: ErrorCategory,
        target_object: Option<serde_json::Value>,
    ) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let (target_name, target_type) = match &target_object {
            Some(value) => (render_target(value), json_kind(value).to_owned()),
            None => (String::new(), String::new()),
        };
        Self {
            exception: Arc::new(exception),
            fully_qualified_error_id: error_id.into(),
            category_info: CategoryInfo {
                category,
                activity: None,
                reason: short_type_name::<E>().to_owned(),
                target_name,
                target_type,
            },
            target_object,
        }
    }

    /// Set the activity shown in [`CategoryInfo`].
    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.category_info.activity = Some(activity.into());
        self
    }

    /// The error this record describes.
    pub fn exception(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.exception.as_ref()
    }

    /// Stable identifier of the failure.
    pub fn fully_qualified_error_id(&self) -> &str {
        &self.fully_qualified_error_id
    }

    /// Category and contextual strings.
    pub fn category_info(&self) -> &CategoryInfo {
        &self.category_info
    }

    /// Shorthand for `self.category_info().category`.
    pub fn category(&self) -> ErrorCategory {
        self.category_info.category
    }

    /// Object the failed operation was acting on, if any.
    pub fn target_object(&self) -> Option<&serde_json::Value> {
        self.target_object.as_ref()
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.exception)
    }
}

/// An error that exposes an [`ErrorRecord`] for structured reporting.
pub trait ContainsErrorRecord: Error {
    /// The record describing this error.
    ///
    /// Implementations build the record at most once and return the same
    /// instance on every call.
    fn error_record(&self) -> &ErrorRecord;
}

// ---------------------------------------------------------------------------
// ParentContainsErrorRecordError
// ---------------------------------------------------------------------------

/// Stand-in exception stored inside a parent's own [`ErrorRecord`].
///
/// Holds a copy of the parent's message rather than the parent itself, so a
/// record never owns the error that owns the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentContainsErrorRecordError {
    message: String,
}

impl ParentContainsErrorRecordError {
    /// Wrap an explicit message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Copy the displayed message of `parent`.
    pub fn from_parent(parent: &dyn Error) -> Self {
        Self::new(parent.to_string())
    }

    /// The duplicated parent message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParentContainsErrorRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ParentContainsErrorRecordError {}

// ---------------------------------------------------------------------------
// Serialization support
// ---------------------------------------------------------------------------

/// Serialisable snapshot of an [`ErrorRecord`] (the exception is reduced to
/// its message).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorRecordDto {
    /// Fully qualified error identifier.
    pub error_id: String,
    /// Category and contextual strings.
    pub category_info: CategoryInfo,
    /// Displayed message of the exception.
    pub message: String,
    /// Target object, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_object: Option<serde_json::Value>,
}

impl From<&ErrorRecord> for ErrorRecordDto {
    fn from(record: &ErrorRecord) -> Self {
        Self {
            error_id: record.fully_qualified_error_id.clone(),
            category_info: record.category_info.clone(),
            message: record.exception.to_string(),
            target_object: record.target_object.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Last path segment of `E`'s type name, without generic arguments.
pub(crate) fn short_type_name<E: ?Sized>() -> &'static str {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn render_target(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
