// SPDX-License-Identifier: MIT OR Apache-2.0
//! Concurrency stress tests for lazily built error records.

use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Barrier};
use std::thread;

use cmdhost_error::{ArgumentNullError, ContainsErrorRecord, NotSupportedError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn assert_send_sync<T: Send + Sync>() {}

/// Call `error_record()` from `threads` threads released together, returning
/// the address each one observed.
fn record_addresses<E>(err: &E, threads: usize) -> HashSet<usize>
where
    E: ContainsErrorRecord + Sync,
{
    let barrier = Barrier::new(threads);
    thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    err.error_record() as *const _ as usize
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("reader thread panicked"))
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn errors_are_send_and_sync() {
    assert_send_sync::<NotSupportedError>();
    assert_send_sync::<ArgumentNullError>();
}

#[test]
fn two_racing_readers_see_one_record() {
    let err = NotSupportedError::new("race");
    assert_eq!(record_addresses(&err, 2).len(), 1);
}

#[test]
fn many_racing_readers_see_one_record() {
    for threads in [4, 16, 64] {
        let err = NotSupportedError::with_cause("race", io::Error::other("cause"));
        let seen = record_addresses(&err, threads);
        assert_eq!(seen.len(), 1, "{threads} threads observed {seen:?}");
        let after = err.error_record() as *const _ as usize;
        assert!(seen.contains(&after));
    }
}

#[test]
fn racing_readers_agree_on_contents() {
    let err = Arc::new(NotSupportedError::new("shared").with_error_id("SharedId"));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let err = Arc::clone(&err);
            thread::spawn(move || err.error_record().fully_qualified_error_id().to_owned())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "SharedId");
    }
}

#[test]
fn argument_null_record_is_also_race_free() {
    let err = ArgumentNullError::new("info");
    assert_eq!(record_addresses(&err, 16).len(), 1);
}
