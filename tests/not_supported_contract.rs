// SPDX-License-Identifier: MIT OR Apache-2.0
//! Contract tests for `NotSupportedError`: construction, cached records,
//! and the field-map serialization hooks.

use std::error::Error;
use std::io;

use cmdhost_error::{
    ContainsErrorRecord, DEFAULT_MESSAGE, DeserializationError, ErrorCategory, NotSupportedError,
    SerializationInfo, SerializedError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One instance per public constructor.
fn every_constructor() -> Vec<NotSupportedError> {
    vec![
        NotSupportedError::default(),
        NotSupportedError::new("cannot nest pipelines"),
        NotSupportedError::with_cause("cannot rewind", io::Error::other("pipe closed")),
        NotSupportedError::new("remoting unavailable").with_error_id("RemotingNotSupported"),
    ]
}

fn roundtrip_fields(err: &NotSupportedError) -> NotSupportedError {
    NotSupportedError::from_fields(&err.to_fields()).expect("fields should deserialize")
}

fn roundtrip_json(err: &NotSupportedError) -> NotSupportedError {
    let json = serde_json::to_string(err).expect("error should serialize");
    serde_json::from_str(&json).expect("json should deserialize")
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn message_and_default_id_preserved() {
    for msg in ["", "x", "unicode ✓ message", "multi\nline"] {
        let err = NotSupportedError::new(msg);
        assert_eq!(err.message(), msg);
        assert_eq!(err.error_id(), "NotSupported");
    }
}

#[test]
fn default_constructor_has_message_and_no_cause() {
    let err = NotSupportedError::default();
    assert_eq!(err.message(), DEFAULT_MESSAGE);
    assert!(err.cause().is_none());
    assert!(err.source().is_none());
}

#[test]
fn cause_is_retained_by_identity() {
    let cause = io::Error::new(io::ErrorKind::Unsupported, "seek");
    let err = NotSupportedError::with_cause("outer", cause);
    let inner = err.cause().expect("cause should be kept");
    let io_err = inner.downcast_ref::<io::Error>().expect("cause keeps its type");
    assert_eq!(io_err.kind(), io::ErrorKind::Unsupported);
    assert_eq!(io_err.to_string(), "seek");
}

// ---------------------------------------------------------------------------
// Error records
// ---------------------------------------------------------------------------

#[test]
fn record_is_returned_by_identity() {
    for err in every_constructor() {
        let a: *const _ = err.error_record();
        let b: *const _ = err.error_record();
        assert_eq!(a, b);
    }
}

#[test]
fn record_category_and_target_are_fixed() {
    for err in every_constructor() {
        let record = err.error_record();
        assert_eq!(record.category(), ErrorCategory::NotImplemented);
        assert!(record.target_object().is_none());
        assert_eq!(record.fully_qualified_error_id(), err.error_id());
    }
}

#[test]
fn record_exception_is_a_wrapper_not_the_error() {
    let err = NotSupportedError::new("wrapped");
    let exception = err.error_record().exception();
    assert!(exception.downcast_ref::<NotSupportedError>().is_none());
    assert_eq!(exception.to_string(), "wrapped");
}

#[test]
fn record_works_through_trait_object() {
    let err = NotSupportedError::new("dyn");
    let holder: &dyn ContainsErrorRecord = &err;
    assert_eq!(holder.error_record().fully_qualified_error_id(), "NotSupported");
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn fields_roundtrip_for_every_constructor() {
    for err in every_constructor() {
        let back = roundtrip_fields(&err);
        assert_eq!(back.error_id(), err.error_id());
        assert_eq!(back.message(), err.message());
    }
}

#[test]
fn json_roundtrip_for_every_constructor() {
    for err in every_constructor() {
        let back = roundtrip_json(&err);
        assert_eq!(back.error_id(), err.error_id());
        assert_eq!(back.message(), err.message());
    }
}

#[test]
fn roundtrip_rebuilds_record_lazily() {
    let err = NotSupportedError::new("x").with_error_id("Custom");
    let _ = err.error_record();
    let back = roundtrip_fields(&err);
    assert_eq!(back.error_record().fully_qualified_error_id(), "Custom");
}

#[test]
fn cause_chain_survives_roundtrip() {
    let middle = NotSupportedError::with_cause("middle", io::Error::other("root"));
    let err = NotSupportedError::with_cause("top", middle);
    let back = roundtrip_json(&err);
    let chain: Vec<String> = back.causes().map(|e| e.to_string()).collect();
    assert_eq!(chain, ["middle", "root"]);
    let middle = back
        .cause()
        .and_then(|c| c.downcast_ref::<SerializedError>())
        .expect("cause should be rebuilt");
    assert_eq!(middle.class_name(), "NotSupportedError");
    assert_eq!(middle.cause().map(SerializedError::class_name), Some("Error"));
}

#[test]
fn default_id_is_always_written() {
    let info = NotSupportedError::default().to_fields();
    assert_eq!(info.get_string("ErrorId"), Ok("NotSupported"));
}

#[test]
fn missing_target_fails_without_writing() {
    let err = NotSupportedError::new("x");
    let failure = err.get_object_data(None).unwrap_err();
    assert_eq!(failure.param_name(), "info");
    assert_eq!(
        failure.error_record().category(),
        ErrorCategory::InvalidArgument
    );
}

#[test]
fn present_target_is_filled() {
    let err = NotSupportedError::new("x");
    let mut info = SerializationInfo::new();
    err.get_object_data(Some(&mut info)).unwrap();
    assert_eq!(info, err.to_fields());
    for field in ["ClassName", "Message", "InnerException", "ErrorId"] {
        assert!(info.contains(field), "missing {field}");
    }
}

#[test]
fn fields_without_error_id_are_rejected() {
    let mut info = NotSupportedError::new("x").to_fields();
    let stripped: SerializationInfo = info
        .iter()
        .filter(|(k, _)| *k != "ErrorId")
        .map(|(k, v)| (k.to_owned(), v.clone()))
        .collect();
    let err = NotSupportedError::from_fields(&stripped).unwrap_err();
    assert!(matches!(err, DeserializationError::MissingField { ref field } if field == "ErrorId"));

    info.add_value("ErrorId", 42);
    let err = NotSupportedError::from_fields(&info).unwrap_err();
    assert!(matches!(err, DeserializationError::WrongType { .. }));
}

#[test]
fn malformed_base_fields_are_rejected() {
    let info = SerializationInfo::from_json(r#"{"ErrorId":"NotSupported"}"#).unwrap();
    let err = NotSupportedError::from_fields(&info).unwrap_err();
    assert!(matches!(err, DeserializationError::MissingField { ref field } if field == "Message"));

    let info =
        SerializationInfo::from_json(r#"{"ErrorId":"X","Message":["not","a","string"]}"#).unwrap();
    assert!(NotSupportedError::from_fields(&info).is_err());
}
