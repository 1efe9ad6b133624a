//! Unified error types for telepress.
//!
//! This module provides a single [`TelepressError`] enum that covers all
//! error cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging
//!
//! Per-record problems (a post without a timestamp, a missing media file, a
//! malformed annotation) are not errors at all — they go through the
//! [`Diagnostics`](crate::diagnostics::Diagnostics) sink and the run
//! continues. Errors here are the fatal cases: unreadable input, a corrupt
//! exchange-format line, unwritable output.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for telepress operations.
pub type Result<T> = std::result::Result<T, TelepressError>;

/// The error type for all telepress operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TelepressError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The archive file doesn't exist
    /// - Permission denied on the output directory
    /// - Disk is full while writing a document
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A line of the NDJSON archive failed to parse.
    ///
    /// A corrupted source produces no partial output: this is fatal to the
    /// whole run.
    #[error("Failed to parse archive record at line {line}{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// 1-based line number of the offending record
        line: usize,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
        /// The archive path, if known
        path: Option<PathBuf>,
    },

    /// The configured time zone name is not a known IANA zone.
    #[error("Unknown time zone '{input}'. Expected an IANA name like Europe/Amsterdam")]
    InvalidTimeZone {
        /// The zone name that failed to parse
        input: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl TelepressError {
    /// Creates a parse error for an archive record.
    pub fn parse(line: usize, source: serde_json::Error, path: Option<PathBuf>) -> Self {
        TelepressError::Parse { line, source, path }
    }

    /// Creates an invalid time zone error.
    pub fn invalid_time_zone(input: impl Into<String>) -> Self {
        TelepressError::InvalidTimeZone {
            input: input.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, TelepressError::Io(_))
    }

    /// Returns `true` if this is a record parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, TelepressError::Parse { .. })
    }
}
