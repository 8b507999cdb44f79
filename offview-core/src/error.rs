/// Error types for mesh loading and configuration
use std::path::PathBuf;

/// Problems with the content of an OFF document.
///
/// Line numbers are 1-based and refer to the original input, comments
/// and blank lines included.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("empty input: no OFF header found")]
    Empty,
    #[error("line {line}: malformed header, expected vertex and face counts")]
    MalformedHeader { line: usize },
    #[error("mesh declares no vertices")]
    NoVertices,
    #[error("line {line}: malformed vertex, expected three coordinates")]
    MalformedVertex { line: usize },
    #[error("line {line}: malformed polygon")]
    MalformedPolygon { line: usize },
    #[error("line {line}: degenerate polygon with {sides} sides (at least 3 required)")]
    DegeneratePolygon { line: usize, sides: usize },
    #[error("line {line}: polygon declares {expected} vertices but lists {found}")]
    PolygonArity {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: vertex index {index} out of range (mesh has {vertex_count} vertices)")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("truncated input: expected {expected} {what}, found {found}")]
    Truncated {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Failure to produce a model from a file on disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid OFF data in {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

impl LoadError {
    /// The content error, if this was not an I/O failure.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            LoadError::Format { source, .. } => Some(source),
            LoadError::Io { .. } => None,
        }
    }
}

/// Viewer configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("rotation axis {0:?} is too short to normalize")]
    InvalidAxis([f32; 3]),
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}
