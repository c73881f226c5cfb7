//! # malconv - MyAnimeList export to AniMehList JSON
//!
//! Converts the XML list export of MyAnimeList (MAL) into the JSON array
//! the AniMehList app imports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  MAL XML    │────▶│   Parser    │────▶│   Mapper    │────▶│  JSON array │
//! │  (export)   │     │  (records)  │     │  (+season)  │     │  (items)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use malconv::{convert_bytes, ConvertOptions};
//!
//! let xml = std::fs::read("animelist.xml")?;
//! let conversion = convert_bytes(&xml, &ConvertOptions::default())?;
//! println!("Converted {} entries", conversion.items.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Source records and target items
//! - [`parser`] - XML parsing with encoding detection
//! - [`transform`] - Season inference, field mapping and pipeline
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConvertError, ConvertResult, ParseError, WriteError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Kind, MalStatus, SourceRecord, Status, TargetItem};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    coerce_int,
    decode_content,
    detect_encoding,
    parse_export_bytes,
    parse_export_file,
    parse_export_str,
    ParsedExport,
};

// =============================================================================
// Re-exports - Season inference
// =============================================================================

pub use transform::season::{infer_season, infer_season_with_rule, roman_value, SeasonRule, SEASON_RULES};

// =============================================================================
// Re-exports - Mapping
// =============================================================================

pub use transform::mapper::{
    build_notes,
    episode_progress,
    map_rating,
    map_record,
    split_tags,
    ConvertOptions,
    NOTES_SEPARATOR,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    convert_bytes,
    convert_export,
    convert_file,
    convert_records,
    to_json,
    write_items,
    Conversion,
    ConversionSummary,
};

// =============================================================================
// Re-exports - Logging
// =============================================================================

pub use logs::{LogConfig, LogFormat, LOGGER};
