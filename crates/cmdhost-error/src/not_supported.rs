// SPDX-License-Identifier: MIT OR Apache-2.0
//! The NotSupported error family.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

use crate::fields::{read_base_fields, write_base_fields};
use crate::{
    ArgumentNullError, ContainsErrorRecord, DeserializationError, ERROR_ID_FIELD, ErrorCategory,
    ErrorRecord, ParentContainsErrorRecordError, SerializationInfo,
};

/// Identifier used when none is given.
pub const DEFAULT_ERROR_ID: &str = "NotSupported";

/// Message used by [`NotSupportedError::default`].
pub const DEFAULT_MESSAGE: &str = "Specified method is not supported.";

const CLASS_NAME: &str = "NotSupportedError";

/// An operation is structurally or contractually unsupported.
///
/// Carries a stable identifier (default [`DEFAULT_ERROR_ID`]) and exposes an
/// [`ErrorRecord`] with category [`ErrorCategory::NotImplemented`] through
/// [`ContainsErrorRecord`]. The record is built on first access and cached.
///
/// ```
/// use cmdhost_error::{ContainsErrorRecord, NotSupportedError};
///
/// let io = std::io::Error::other("pipe closed");
/// let err = NotSupportedError::with_cause("cannot rewind a stream", io)
///     .with_error_id("StreamNotSeekable");
/// assert_eq!(err.error_id(), "StreamNotSeekable");
/// assert!(std::ptr::eq(err.error_record(), err.error_record()));
/// ```
pub struct NotSupportedError {
    message: String,
    cause: Option<Box<dyn Error + Send + Sync>>,
    error_id: String,
    error_record: OnceLock<ErrorRecord>,
}

impl NotSupportedError {
    /// Error with `message`, no cause, and the default identifier.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            error_id: DEFAULT_ERROR_ID.to_owned(),
            error_record: OnceLock::new(),
        }
    }

    /// Error with `message` chained onto `cause`.
    pub fn with_cause(
        message: impl Into<String>,
        cause: impl Error + Send + Sync + 'static,
    ) -> Self {
        let mut err = Self::new(message);
        err.cause = Some(Box::new(cause));
        err
    }

    /// Replace the identifier.
    ///
    /// Consumes `self`, so a record cached under the old identifier is
    /// discarded.
    pub fn with_error_id(self, error_id: impl Into<String>) -> Self {
        Self {
            error_id: error_id.into(),
            error_record: OnceLock::new(),
            ..self
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stable machine-readable identifier.
    pub fn error_id(&self) -> &str {
        &self.error_id
    }

    /// The directly chained cause, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Every error below this one, nearest first.
    pub fn causes(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        std::iter::successors(self.source(), |&e| e.source())
    }

    /// The deepest error in the chain, or `None` without a cause.
    pub fn root_cause(&self) -> Option<&(dyn Error + 'static)> {
        self.causes().last()
    }

    /// Write the base fields and `ErrorId` into `info`.
    ///
    /// Fails with [`ArgumentNullError`] when no target is supplied; nothing
    /// is written in that case.
    pub fn get_object_data(
        &self,
        info: Option<&mut SerializationInfo>,
    ) -> Result<(), ArgumentNullError> {
        let info = info.ok_or_else(|| ArgumentNullError::new("info"))?;
        self.write_fields(info);
        Ok(())
    }

    /// Serialized fields of this error.
    pub fn to_fields(&self) -> SerializationInfo {
        let mut info = SerializationInfo::new();
        self.write_fields(&mut info);
        info
    }

    fn write_fields(&self, info: &mut SerializationInfo) {
        write_base_fields(
            info,
            CLASS_NAME,
            &self.message,
            self.cause.as_deref().map(|c| c as &(dyn Error + 'static)),
        );
        info.add_value(ERROR_ID_FIELD, self.error_id.as_str());
        tracing::trace!(target: "cmdhost.error", error_id = %self.error_id, "serialized error");
    }

    /// Rebuild an error from serialized fields.
    ///
    /// The identifier is restored exactly; a cause comes back as a
    /// [`SerializedError`](crate::SerializedError) chain. No record is
    /// restored, it is rebuilt on demand.
    pub fn from_fields(info: &SerializationInfo) -> Result<Self, DeserializationError> {
        let result = read_base_fields(info).and_then(|base| {
            let error_id = info.get_string(ERROR_ID_FIELD)?.to_owned();
            Ok(Self {
                message: base.message,
                cause: base
                    .cause
                    .map(|c| Box::new(c) as Box<dyn Error + Send + Sync>),
                error_id,
                error_record: OnceLock::new(),
            })
        });
        if let Err(ref e) = result {
            tracing::debug!(target: "cmdhost.error", error = %e, "failed to deserialize error");
        }
        result
    }
}

impl Default for NotSupportedError {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE)
    }
}

impl ContainsErrorRecord for NotSupportedError {
    fn error_record(&self) -> &ErrorRecord {
        self.error_record.get_or_init(|| {
            tracing::debug!(target: "cmdhost.error", error_id = %self.error_id, "building error record");
            ErrorRecord::new(
                ParentContainsErrorRecordError::from_parent(self),
                self.error_id.clone(),
                ErrorCategory::NotImplemented,
                None,
            )
        })
    }
}

impl fmt::Debug for NotSupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("NotSupportedError");
        d.field("error_id", &self.error_id);
        d.field("message", &self.message);
        if let Some(ref cause) = self.cause {
            d.field("cause", &cause.to_string());
        }
        d.finish()
    }
}

impl fmt::Display for NotSupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for NotSupportedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl Serialize for NotSupportedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_fields().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotSupportedError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let info = SerializationInfo::deserialize(deserializer)?;
        Self::from_fields(&info).map_err(serde::de::Error::custom)
    }
}
