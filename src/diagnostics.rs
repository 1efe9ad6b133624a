//! Diagnostics sink for skip-and-continue recovery.
//!
//! The conversion core never prints. Every recoverable problem — a post
//! without a timestamp, a media file that is not on disk, a malformed or
//! overlapping annotation — is recorded here as a [`Diagnostic`], so the
//! CLI can report each occurrence and tests can assert on exactly what was
//! skipped.

use std::fmt;

/// Category of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// A post had no resolvable timestamp and was dropped from aggregation.
    MissingTimestamp,

    /// A referenced media file did not resolve to an existing file.
    MediaNotFound,

    /// A post carried media at the source but the archive has no files for it.
    MediaNotDownloaded,

    /// An annotation was missing its offset or length and was skipped.
    InvalidAnnotation,

    /// An annotation span ran past the end of the text and was skipped.
    AnnotationOutOfRange,

    /// Two annotation spans overlapped; the later one was skipped.
    OverlappingAnnotation,

    /// A bucket produced neither text nor images and was not written.
    EmptyDocument,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::MissingTimestamp => "missing timestamp",
            DiagnosticKind::MediaNotFound => "media not found",
            DiagnosticKind::MediaNotDownloaded => "media not downloaded",
            DiagnosticKind::InvalidAnnotation => "invalid annotation",
            DiagnosticKind::AnnotationOutOfRange => "annotation out of range",
            DiagnosticKind::OverlappingAnnotation => "overlapping annotation",
            DiagnosticKind::EmptyDocument => "empty document",
        };
        write!(f, "{name}")
    }
}

/// One recorded problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

/// Ordered collection of diagnostics for one run.
///
/// Passed as `&mut` through the core; owned by the caller.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one problem.
    pub fn warn(&mut self, kind: DiagnosticKind, detail: impl Into<String>) {
        self.entries.push(Diagnostic {
            kind,
            detail: detail.into(),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns how many entries have the given kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}
