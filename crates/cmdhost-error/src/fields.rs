// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tagged field maps used to move errors across serialization boundaries.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use crate::{ArgumentNullError, NotSupportedError, json_kind};

/// Field holding the short type name of the serialized error.
pub const CLASS_NAME_FIELD: &str = "ClassName";
/// Field holding the displayed message.
pub const MESSAGE_FIELD: &str = "Message";
/// Field holding the nested cause, or `null`.
pub const INNER_EXCEPTION_FIELD: &str = "InnerException";
/// Field holding the stable error identifier.
pub const ERROR_ID_FIELD: &str = "ErrorId";

/// Deepest cause chain written or accepted.
pub const MAX_CAUSE_DEPTH: usize = 64;

// ---------------------------------------------------------------------------
// DeserializationError
// ---------------------------------------------------------------------------

/// Failure to rebuild an error from its serialized fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeserializationError {
    /// A required field is absent.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Name of the field.
        field: String,
    },

    /// A field is present but holds the wrong JSON type.
    #[error("field `{field}` must be {expected}, found {found}")]
    WrongType {
        /// Name of the field.
        field: String,
        /// Expected JSON type.
        expected: &'static str,
        /// JSON type actually present.
        found: &'static str,
    },

    /// The nested cause chain exceeds [`MAX_CAUSE_DEPTH`].
    #[error("cause chain deeper than {limit} levels")]
    CauseTooDeep {
        /// The depth limit.
        limit: usize,
    },

    /// The input is not a field map at all.
    #[error("malformed serialized error: {reason}")]
    Malformed {
        /// Parser detail.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// SerializationInfo
// ---------------------------------------------------------------------------

/// Name/value field map an error writes itself into.
///
/// Serialises transparently as a JSON object with deterministic key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SerializationInfo {
    fields: BTreeMap<String, Value>,
}

impl SerializationInfo {
    /// Empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object into a field map.
    pub fn from_json(s: &str) -> Result<Self, DeserializationError> {
        serde_json::from_str(s).map_err(|e| DeserializationError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Insert or replace a field.
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Raw value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String value of a required field.
    pub fn get_string(&self, name: &str) -> Result<&str, DeserializationError> {
        string_field(self.fields.get(name), name)
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` when no field has been written.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for SerializationInfo {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<SerializationInfo> for Value {
    fn from(info: SerializationInfo) -> Self {
        Value::Object(info.fields.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// SerializedError
// ---------------------------------------------------------------------------

/// A cause rebuilt from serialized fields.
///
/// The type name, message and error id (when the cause had one) survive the
/// trip; the chain below it is kept so callers can still walk to the root
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedError {
    class_name: String,
    message: String,
    error_id: Option<String>,
    cause: Option<Box<SerializedError>>,
}

impl SerializedError {
    /// Short type name recorded when the cause was serialized.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Message recorded when the cause was serialized.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error id recorded when the cause carried one.
    pub fn error_id(&self) -> Option<&str> {
        self.error_id.as_deref()
    }

    /// The next cause down the chain.
    pub fn cause(&self) -> Option<&SerializedError> {
        self.cause.as_deref()
    }

    fn from_value(value: &Value, depth: usize) -> Result<Self, DeserializationError> {
        if depth > MAX_CAUSE_DEPTH {
            return Err(DeserializationError::CauseTooDeep {
                limit: MAX_CAUSE_DEPTH,
            });
        }
        let Value::Object(map) = value else {
            return Err(DeserializationError::WrongType {
                field: INNER_EXCEPTION_FIELD.to_owned(),
                expected: "an object",
                found: json_kind(value),
            });
        };
        let base = read_base_fields_at(|name| map.get(name), depth + 1)?;
        let error_id = optional_string_field(map.get(ERROR_ID_FIELD), ERROR_ID_FIELD)?;
        Ok(Self {
            class_name: base.class_name.unwrap_or_else(|| "Error".to_owned()),
            message: base.message,
            error_id,
            cause: base.cause.map(Box::new),
        })
    }
}

impl fmt::Display for SerializedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for SerializedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

// ---------------------------------------------------------------------------
// Base fields
// ---------------------------------------------------------------------------

/// Fields every serialized error carries.
pub(crate) struct BaseFields {
    pub(crate) class_name: Option<String>,
    pub(crate) message: String,
    pub(crate) cause: Option<SerializedError>,
}

pub(crate) fn write_base_fields(
    info: &mut SerializationInfo,
    class_name: &str,
    message: &str,
    cause: Option<&(dyn Error + 'static)>,
) {
    info.add_value(CLASS_NAME_FIELD, class_name);
    info.add_value(MESSAGE_FIELD, message);
    let inner = cause.map_or(Value::Null, |c| cause_to_value(c, 1));
    info.add_value(INNER_EXCEPTION_FIELD, inner);
}

pub(crate) fn read_base_fields(info: &SerializationInfo) -> Result<BaseFields, DeserializationError> {
    read_base_fields_at(|name| info.get(name), 1)
}

// `field` looks a name up in whichever map holds this level, so nested
// causes are read in place.
fn read_base_fields_at<'a>(
    field: impl Fn(&str) -> Option<&'a Value>,
    depth: usize,
) -> Result<BaseFields, DeserializationError> {
    let class_name = optional_string_field(field(CLASS_NAME_FIELD), CLASS_NAME_FIELD)?;
    let message = string_field(field(MESSAGE_FIELD), MESSAGE_FIELD)?.to_owned();
    let cause = match field(INNER_EXCEPTION_FIELD) {
        None | Some(Value::Null) => None,
        Some(value) => Some(SerializedError::from_value(value, depth)?),
    };
    Ok(BaseFields {
        class_name,
        message,
        cause,
    })
}

fn string_field<'a>(value: Option<&'a Value>, name: &str) -> Result<&'a str, DeserializationError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(DeserializationError::WrongType {
            field: name.to_owned(),
            expected: "a string",
            found: json_kind(other),
        }),
        None => Err(DeserializationError::MissingField {
            field: name.to_owned(),
        }),
    }
}

/// Absent and `null` both read as `None`.
fn optional_string_field(
    value: Option<&Value>,
    name: &str,
) -> Result<Option<String>, DeserializationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(_) => string_field(value, name).map(|s| Some(s.to_owned())),
    }
}

fn cause_to_value(err: &(dyn Error + 'static), depth: usize) -> Value {
    let mut nested = SerializationInfo::new();
    nested.add_value(CLASS_NAME_FIELD, class_name_of(err));
    nested.add_value(MESSAGE_FIELD, err.to_string());
    if let Some(id) = error_id_of(err) {
        nested.add_value(ERROR_ID_FIELD, id);
    }
    let inner = match err.source() {
        Some(next) if depth < MAX_CAUSE_DEPTH => cause_to_value(next, depth + 1),
        _ => Value::Null,
    };
    nested.add_value(INNER_EXCEPTION_FIELD, inner);
    nested.into()
}

fn error_id_of<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a str> {
    if let Some(serialized) = err.downcast_ref::<SerializedError>() {
        serialized.error_id()
    } else {
        err.downcast_ref::<NotSupportedError>()
            .map(NotSupportedError::error_id)
    }
}

fn class_name_of(err: &(dyn Error + 'static)) -> String {
    if let Some(serialized) = err.downcast_ref::<SerializedError>() {
        serialized.class_name.clone()
    } else if err.is::<NotSupportedError>() {
        "NotSupportedError".to_owned()
    } else if err.is::<ArgumentNullError>() {
        "ArgumentNullError".to_owned()
    } else {
        "Error".to_owned()
    }
}
