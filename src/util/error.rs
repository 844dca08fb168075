//! Error types for the JT decoder.

use std::path::PathBuf;
use thiserror::Error;

use super::Guid;

/// Main error type for JT decoding.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Header lacks the version marker or major version digits
    #[error("Malformed JT header: {0}")]
    MalformedHeader(String),

    /// Compression tag outside the known algorithms
    #[error("Unsupported compression algorithm {algorithm} at byte {offset}")]
    UnsupportedCompressionAlgorithm { algorithm: u8, offset: u64 },

    /// Inflating a compressed element block failed
    #[error("{algorithm} decompression failed: {message}")]
    Decompression { algorithm: &'static str, message: String },

    /// Read past the end of the byte source
    #[error("Unexpected end of data at byte {offset} (wanted {requested} bytes)")]
    OutOfData { offset: u64, requested: usize },

    /// Element type GUID not present in the type registry
    #[error("Unrecognized element type {guid} at byte {offset}")]
    UnrecognizedElementType { guid: Guid, offset: u64 },

    /// Element type is known but has no decode path
    #[error("No decoder for {kind} ({guid}) at byte {offset}")]
    UnimplementedDecoder { kind: &'static str, guid: Guid, offset: u64 },

    /// Caller broke a documented precondition (e.g. bit width too large)
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// Invalid data structure in file
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// Segment GUID referenced but not listed in the TOC
    #[error("Segment {0} is not listed in the table of contents")]
    UnknownSegment(Guid),

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// Fatal error inside a segment, tagged with where the segment starts
    #[error("Segment {guid} (file byte {offset}): {source}")]
    Segment {
        guid: Guid,
        offset: u64,
        #[source]
        source: Box<Error>,
    },

    /// Error inside an inflated element block; offsets in `source` count from
    /// the start of the inflated data, not the file
    #[error("in {algorithm}-inflated data packed at file byte {packed_offset}: {source}")]
    Inflated {
        algorithm: &'static str,
        packed_offset: u64,
        #[source]
        source: Box<Error>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Tag an error with the segment it came from.
    pub fn in_segment(self, guid: Guid, offset: u64) -> Self {
        Self::Segment { guid, offset, source: Box::new(self) }
    }

    /// The innermost error, past any segment or inflation context.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Segment { source, .. } | Self::Inflated { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Errors that only end the current segment's element loop.
    ///
    /// Everything else aborts the whole file decode.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedElementType { .. } | Self::UnimplementedDecoder { .. }
        )
    }
}

/// Result type alias for JT operations.
pub type Result<T> = std::result::Result<T, Error>;
