// crates/stubcheck-core/src/core/record.rs
// ============================================================================
// Module: Stubcheck Result Records
// Description: Persisted per-test outcome and its execution timestamp.
// Purpose: Define the row shape the result store reads and writes.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! A [`ResultRecord`] is one row of the result store. [`ExecutionTime`] is a
//! UTC wall-clock instant at second precision whose text form
//! (`YYYY-MM-DD HH:MM:SS`) is what the store keeps in `execution_time`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde::Serializer;
use thiserror::Error;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::core::identifiers::TestName;
use crate::core::status::TestStatus;

// ============================================================================
// SECTION: Execution Time
// ============================================================================

/// Text layout of a stored execution time.
const EXECUTION_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Errors raised when building or parsing an [`ExecutionTime`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionTimeError {
    /// Unix seconds fell outside the supported range.
    #[error("execution time out of range: {0}")]
    OutOfRange(i64),
    /// Stored text did not follow `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid execution time text `{text}`: {detail}")]
    Parse {
        /// Offending text.
        text: String,
        /// Parser message.
        detail: String,
    },
}

/// UTC instant at which a result was last written.
///
/// # Invariants
/// - Sub-second precision is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExecutionTime(OffsetDateTime);

impl ExecutionTime {
    /// Reads the wall clock, truncated to whole seconds.
    #[must_use]
    pub fn now() -> Self {
        let now = OffsetDateTime::now_utc();
        Self(now.replace_nanosecond(0).unwrap_or(now))
    }

    /// Builds an execution time from unix seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionTimeError::OutOfRange`] for unrepresentable values.
    pub fn from_unix_seconds(seconds: i64) -> Result<Self, ExecutionTimeError> {
        OffsetDateTime::from_unix_timestamp(seconds)
            .map(Self)
            .map_err(|_| ExecutionTimeError::OutOfRange(seconds))
    }

    /// Returns unix seconds.
    #[must_use]
    pub const fn unix_seconds(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Parses the stored `YYYY-MM-DD HH:MM:SS` text as UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionTimeError::Parse`] when the text does not match.
    pub fn parse_text(text: &str) -> Result<Self, ExecutionTimeError> {
        PrimitiveDateTime::parse(text, EXECUTION_TIME_FORMAT)
            .map(|value| Self(value.assume_utc()))
            .map_err(|err| ExecutionTimeError::Parse {
                text: text.to_string(),
                detail: err.to_string(),
            })
    }
}

impl fmt::Display for ExecutionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

impl Serialize for ExecutionTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// SECTION: Result Record
// ============================================================================

/// Latest persisted outcome of one named test.
///
/// # Invariants
/// - At most one record exists per `test_name` in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    /// Unique test key.
    pub test_name: TestName,
    /// Last recorded status.
    pub status: TestStatus,
    /// Time of the last write.
    pub execution_time: ExecutionTime,
}
