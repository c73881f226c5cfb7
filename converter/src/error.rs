//! Error types for the MAL conversion pipeline.
//!
//! - [`ParseError`] - reading, decoding or parsing the XML export
//! - [`WriteError`] - creating the output directory or writing the JSON
//! - [`ConvertError`] - top-level orchestration errors
//!
//! Numeric fields that fail to parse are not errors: they are coerced to
//! their default by [`crate::parser::coerce_int`].

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Parse Errors
// =============================================================================

/// Errors while reading and parsing the MAL export. Always fatal.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input file missing or unreadable.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes could not be decoded with the declared or detected encoding.
    #[error("Failed to decode input: {0}")]
    Encoding(String),

    /// The document is not well-formed XML.
    #[error("Malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    /// No root element found.
    #[error("No root element found in XML document")]
    MissingRoot,

    /// Element or text after the root element was closed.
    #[error("Junk after document element at byte {0}")]
    TrailingContent(u64),
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while persisting the converted items. Always fatal.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Parent directory could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Items could not be serialized.
    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),
}

// =============================================================================
// Convert Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert_file`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Write error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
