//! Error and warning types for relayout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for relayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during structure analysis.
///
/// Per-page and per-region problems never surface here; they degrade to
/// simpler classifications and are reported as [`Warning`]s instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The input document contains no pages.
    #[error("Input document has no pages")]
    EmptyDocument,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error during rendering of the structural tree.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Category of a degradation recorded during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A word with a non-finite or inverted bounding box was skipped.
    MalformedInput,
    /// A graphics region could not be resolved into a consistent grid and
    /// was demoted to plain paragraphs.
    AmbiguousTable,
    /// Font analysis found no usable size distribution; everything
    /// classifies as body text.
    StatisticsUnavailable,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WarningKind::MalformedInput => "malformed input",
            WarningKind::AmbiguousTable => "ambiguous table",
            WarningKind::StatisticsUnavailable => "statistics unavailable",
        };
        f.write_str(s)
    }
}

/// A non-fatal degradation recorded during analysis and returned to the
/// caller alongside the structural output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    /// Page number the warning applies to (0 for document-wide warnings)
    pub page: u32,
    /// Warning category
    pub kind: WarningKind,
    /// Human-readable detail
    pub message: String,
}

impl Warning {
    /// Create a new warning. Every warning is also emitted through the
    /// `log` facade at warn level.
    pub fn new(page: u32, kind: WarningKind, message: impl Into<String>) -> Self {
        let warning = Self {
            page,
            kind,
            message: message.into(),
        };
        log::warn!("{warning}");
        warning
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {}: {}: {}", self.page, self.kind, self.message)
    }
}
