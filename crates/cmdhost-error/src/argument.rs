// SPDX-License-Identifier: MIT OR Apache-2.0
//! The error returned when a required argument is missing.

use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

use crate::{ContainsErrorRecord, ErrorCategory, ErrorRecord, ParentContainsErrorRecordError};

const ERROR_ID: &str = "ArgumentNull";

/// A required argument was not supplied.
///
/// This is a contract violation by the caller. Its record uses the
/// identifier `"ArgumentNull"` and category [`ErrorCategory::InvalidArgument`].
pub struct ArgumentNullError {
    param_name: String,
    message: String,
    error_record: OnceLock<ErrorRecord>,
}

impl ArgumentNullError {
    /// Error for the missing parameter `param_name`.
    pub fn new(param_name: impl Into<String>) -> Self {
        let param_name = param_name.into();
        let message = format!("Value cannot be null. (Parameter '{param_name}')");
        Self {
            param_name,
            message,
            error_record: OnceLock::new(),
        }
    }

    /// Name of the missing parameter.
    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ContainsErrorRecord for ArgumentNullError {
    fn error_record(&self) -> &ErrorRecord {
        self.error_record.get_or_init(|| {
            ErrorRecord::new(
                ParentContainsErrorRecordError::from_parent(self),
                ERROR_ID,
                ErrorCategory::InvalidArgument,
                None,
            )
        })
    }
}

impl fmt::Debug for ArgumentNullError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentNullError")
            .field("param_name", &self.param_name)
            .finish()
    }
}

impl fmt::Display for ArgumentNullError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ArgumentNullError {}
