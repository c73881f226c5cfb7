//! High-level pipeline API for MAL XML to JSON conversion.
//!
//! Combines parsing, mapping and writing. Everything is built in memory
//! before the output file is touched, so a failed run never leaves a
//! partial file behind.
//!
//! # Example
//!
//! ```rust,ignore
//! use malconv::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! let conversion = convert_file(
//!     Path::new("animelist.xml"),
//!     Path::new("out/animelist.json"),
//!     &ConvertOptions::default(),
//! )?;
//! println!("Converted {} entries", conversion.items.len());
//! ```

use std::fs;
use std::path::Path;

use super::mapper::{map_record, ConvertOptions};
use super::season::infer_season_with_rule;
use crate::error::{ConvertResult, WriteError, WriteResult};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning, LOGGER};
use crate::models::{SourceRecord, TargetItem};
use crate::parser::{parse_export_bytes, parse_export_file, ParsedExport};

/// Counts gathered during one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// `<anime>` records in the input
    pub total_records: usize,
    /// Items in the output
    pub converted: usize,
    /// Records left out because they are dropped
    pub skipped_dropped: usize,
    /// Items with an inferred season
    pub season_inferred: usize,
    /// Input encoding, when the input was decoded from bytes
    pub encoding: Option<String>,
}

/// Result of a conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Items in source order
    pub items: Vec<TargetItem>,
    pub summary: ConversionSummary,
}

/// Convert a MAL export file and write the JSON array to `output`.
///
/// This is the main entry point. It:
/// 1. Reads and parses the whole export
/// 2. Maps every record, dropping filtered ones
/// 3. Creates the output directory if needed
/// 4. Writes the JSON array in one shot
///
/// The returned [`Conversion`] holds the same items that were written.
/// A failure is also logged at error level before it is returned.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> ConvertResult<Conversion> {
    run_conversion(input, output, options).map_err(|e| {
        log_error(e.to_string());
        e
    })
}

fn run_conversion(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> ConvertResult<Conversion> {
    log_info(format!("📖 Reading MAL export: {}", input.display()));
    let export = parse_export_file(input)?;
    let conversion = convert_export(export, options);

    log_info(format!("💾 Writing {}", output.display()));
    write_items(&conversion.items, output)?;
    log_success(format!("Wrote {} items", conversion.items.len()));

    Ok(conversion)
}

/// Convert raw export bytes without touching the filesystem.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> ConvertResult<Conversion> {
    let export = parse_export_bytes(bytes)?;
    Ok(convert_export(export, options))
}

/// Convert an already parsed export.
pub fn convert_export(export: ParsedExport, options: &ConvertOptions) -> Conversion {
    log_success(format!("Detected encoding: {}", export.encoding));
    log_success(format!(
        "Read {} anime entries from <{}>",
        export.records.len(),
        export.root
    ));

    let mut conversion = convert_records(&export.records, options);
    conversion.summary.encoding = Some(export.encoding);
    conversion
}

/// Map records in order, leaving out filtered ones.
pub fn convert_records(records: &[SourceRecord], options: &ConvertOptions) -> Conversion {
    log_info("⚙️  Mapping entries...");
    let verbose = LOGGER.config().enabled;

    let items: Vec<TargetItem> = records
        .iter()
        .filter_map(|record| {
            let item = map_record(record, options)?;
            if verbose && item.season.is_some() {
                if let Some((season, rule)) = infer_season_with_rule(&record.title) {
                    log_info_indent(
                        format!("{} → season {} ({})", record.title, season, rule),
                        1,
                    );
                }
            }
            Some(item)
        })
        .collect();

    let summary = ConversionSummary {
        total_records: records.len(),
        converted: items.len(),
        skipped_dropped: records.len() - items.len(),
        season_inferred: items.iter().filter(|i| i.season.is_some()).count(),
        encoding: None,
    };
    print_summary(&summary);

    Conversion { items, summary }
}

/// Serialize items as an indented JSON array. Non-ASCII is kept literal.
pub fn to_json(items: &[TargetItem]) -> WriteResult<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Write items to `output`, creating parent directories first.
pub fn write_items(items: &[TargetItem], output: &Path) -> WriteResult<()> {
    let json = to_json(items)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(output, json).map_err(|source| WriteError::Write {
        path: output.to_path_buf(),
        source,
    })
}

/// Print conversion counts
fn print_summary(summary: &ConversionSummary) {
    log_success(format!("Converted {} entries", summary.converted));
    if summary.skipped_dropped > 0 {
        log_warning(format!(
            "{} dropped entries skipped (use --include-dropped to keep them)",
            summary.skipped_dropped
        ));
    }
    log_info(format!("Seasons inferred: {}", summary.season_inferred));
}
