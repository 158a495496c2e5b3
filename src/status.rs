//! Sign-encoded results for callers that only understand integer status.
//!
//! Success is non-negative: `1` for operations without a result and the
//! level (`0` or `1`) for reads. Failures map to the negative code of their
//! [`ErrorKind`](crate::ErrorKind).

use crate::{errors::Error, pin::Level};

pub const LOW: i32 = 0;
pub const HIGH: i32 = 1;

pub const IN: i32 = 0;
pub const OUT: i32 = 1;
pub const INOUT: i32 = 2;

/// Status returned by successful operations that carry no value
pub const OK: i32 = 1;

pub trait IntoStatus {
    fn into_status(self) -> i32;
}

impl IntoStatus for Result<(), Error> {
    fn into_status(self) -> i32 {
        match self {
            Ok(()) => OK,
            Err(e) => e.status(),
        }
    }
}

impl IntoStatus for Result<Level, Error> {
    fn into_status(self) -> i32 {
        match self {
            Ok(level) => level.into(),
            Err(e) => e.status(),
        }
    }
}
