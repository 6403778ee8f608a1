// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz NotSupportedError deserialization from arbitrary JSON.
//!
//! Verifies:
//! 1. Deserializing arbitrary strings never panics.
//! 2. Successfully deserialized errors build a record without panicking.
//! 3. Re-serializing keeps the id and message.
#![no_main]
use cmdhost_error::{ContainsErrorRecord, ErrorCategory, NotSupportedError, SerializationInfo};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    // --- Property 1: parsing never panics ---
    let info = match SerializationInfo::from_json(s) {
        Ok(info) => info,
        Err(_) => return,
    };
    let err = match NotSupportedError::from_fields(&info) {
        Ok(err) => err,
        Err(e) => {
            let _ = format!("{e}");
            return;
        }
    };

    // --- Property 2: record is well-formed ---
    let record = err.error_record();
    assert_eq!(record.category(), ErrorCategory::NotImplemented);
    assert_eq!(record.fully_qualified_error_id(), err.error_id());
    let _ = err.causes().count();

    // --- Property 3: id and message survive a second trip ---
    let back = NotSupportedError::from_fields(&err.to_fields())
        .expect("re-serialized fields must deserialize");
    assert_eq!(back.error_id(), err.error_id());
    assert_eq!(back.message(), err.message());
});
