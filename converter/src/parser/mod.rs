//! MAL XML export parser with encoding detection.
//!
//! Reads the `<anime>` children of the document root into [`SourceRecord`]s.
//! No mapping logic here: values are kept verbatim apart from trimming and
//! integer coercion.

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ParseError, ParseResult};
use crate::models::SourceRecord;

/// Element name of one list entry.
const RECORD_ELEMENT: &str = "anime";

/// `encoding="..."` inside the XML declaration.
static DECLARED_ENCODING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:\-]+)["']"#)
        .expect("Invalid encoding declaration pattern")
});

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParsedExport {
    /// Records in document order
    pub records: Vec<SourceRecord>,
    /// Encoding used to decode the input
    pub encoding: String,
    /// Name of the root element (`myanimelist` for real exports)
    pub root: String,
}

/// Parse a string leniently as an integer, falling back to `default`.
///
/// Absent or unparseable values are not errors.
pub fn coerce_int(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Detect the encoding of raw bytes.
///
/// A byte-order mark wins, then the XML declaration, then UTF-8.
/// Returns the encoding and the length of the BOM to skip.
pub fn detect_encoding(bytes: &[u8]) -> ParseResult<(&'static Encoding, usize)> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return Ok((encoding, bom_len));
    }

    let head_len = bytes.len().min(256);
    let head = String::from_utf8_lossy(&bytes[..head_len]);
    match DECLARED_ENCODING.captures(&head) {
        Some(caps) => {
            let label = &caps[1];
            Encoding::for_label(label.as_bytes())
                .map(|encoding| (encoding, 0))
                .ok_or_else(|| ParseError::Encoding(format!("unknown encoding '{}'", label)))
        }
        None => Ok((UTF_8, 0)),
    }
}

/// Decode bytes to a string, detecting the encoding.
pub fn decode_content(bytes: &[u8]) -> ParseResult<(String, &'static str)> {
    let (encoding, bom_len) = detect_encoding(bytes)?;
    let content = encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or_else(|| {
            ParseError::Encoding(format!("input is not valid {}", encoding.name()))
        })?;
    Ok((content.into_owned(), encoding.name()))
}

/// Parse a MAL export file.
///
/// # Example
/// ```ignore
/// let export = parse_export_file("animelist.xml")?;
/// println!("{} records ({})", export.records.len(), export.encoding);
/// ```
pub fn parse_export_file<P: AsRef<Path>>(path: P) -> ParseResult<ParsedExport> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_export_bytes(&bytes)
}

/// Parse raw export bytes with encoding detection.
pub fn parse_export_bytes(bytes: &[u8]) -> ParseResult<ParsedExport> {
    let (content, encoding) = decode_content(bytes)?;
    parse_export_str(&content, encoding)
}

/// Parse an already decoded export.
pub fn parse_export_str(content: &str, encoding: &str) -> ParseResult<ParsedExport> {
    check_chars(content, 0)?;

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut records = Vec::new();
    let mut root: Option<String> = None;
    let mut root_closed = false;
    let mut open: Vec<String> = Vec::new();
    let mut current: Option<RecordBuilder> = None;
    let mut field: Option<FieldCapture> = None;

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Malformed {
            position: reader.error_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(e) => {
                if root_closed {
                    return Err(ParseError::TrailingContent(reader.buffer_position() as u64));
                }
                let name = check_element(&e, reader.buffer_position() as u64)?;
                open.push(name.clone());

                match open.len() {
                    1 => root = Some(name),
                    2 if name == RECORD_ELEMENT => current = Some(RecordBuilder::default()),
                    3 if current.is_some() => field = Some(FieldCapture::new(name)),
                    _ => {
                        if let Some(ref mut capture) = field {
                            capture.saw_child = true;
                        }
                    }
                }
            }
            Event::Empty(e) => {
                if root_closed {
                    return Err(ParseError::TrailingContent(reader.buffer_position() as u64));
                }
                let name = check_element(&e, reader.buffer_position() as u64)?;

                match open.len() {
                    0 => {
                        root = Some(name);
                        root_closed = true;
                    }
                    1 if name == RECORD_ELEMENT => records.push(RecordBuilder::default().build()),
                    2 => {
                        if let Some(ref mut builder) = current {
                            builder.set(name, String::new());
                        }
                    }
                    _ => {
                        if let Some(ref mut capture) = field {
                            capture.saw_child = true;
                        }
                    }
                }
            }
            Event::Text(e) => {
                let position = reader.buffer_position() as u64;
                if e.windows(3).any(|w| w == b"]]>") {
                    return Err(malformed(position, "']]>' in character data"));
                }
                let text = e
                    .unescape()
                    .map_err(|err| malformed(position, err.to_string()))?;
                // Character references can still produce illegal characters
                check_chars(&text, position)?;

                if open.is_empty() {
                    if !text.trim().is_empty() {
                        return Err(if root_closed {
                            ParseError::TrailingContent(reader.buffer_position() as u64)
                        } else {
                            ParseError::Malformed {
                                position: reader.buffer_position() as u64,
                                message: "text before root element".to_string(),
                            }
                        });
                    }
                } else if open.len() == 3 {
                    if let Some(ref mut capture) = field {
                        capture.push(&text);
                    }
                }
            }
            Event::CData(e) => {
                if open.len() == 3 {
                    if let Some(ref mut capture) = field {
                        capture.push(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
            }
            Event::Comment(e) => {
                if e.windows(2).any(|w| w == b"--") || e.ends_with(b"-") {
                    return Err(malformed(
                        reader.buffer_position() as u64,
                        "'--' inside comment",
                    ));
                }
            }
            Event::End(_) => {
                match open.len() {
                    3 => {
                        if let (Some(capture), Some(builder)) = (field.take(), current.as_mut()) {
                            builder.set(capture.name, capture.text);
                        }
                    }
                    2 => {
                        if let Some(builder) = current.take() {
                            records.push(builder.build());
                        }
                    }
                    1 => root_closed = true,
                    _ => {}
                }
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(ParseError::Malformed {
            position: reader.buffer_position() as u64,
            message: format!("unclosed element <{}>", unclosed),
        });
    }

    let root = root.ok_or(ParseError::MissingRoot)?;

    Ok(ParsedExport {
        records,
        encoding: encoding.to_string(),
        root,
    })
}

fn malformed(position: u64, message: impl Into<String>) -> ParseError {
    ParseError::Malformed {
        position,
        message: message.into(),
    }
}

/// Validate an element's name and attributes, returning its name.
fn check_element(e: &BytesStart, position: u64) -> ParseResult<String> {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
    if !is_xml_name(&name) {
        return Err(malformed(position, format!("invalid element name '{}'", name)));
    }

    let mut attributes = e.attributes();
    attributes.with_checks(true);
    for attr in attributes {
        let attr = attr.map_err(|err| malformed(position, err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        if !is_xml_name(&key) {
            return Err(malformed(position, format!("invalid attribute name '{}'", key)));
        }
        if attr.value.contains(&b'<') {
            return Err(malformed(position, format!("'<' in value of attribute '{}'", key)));
        }
        let value = attr
            .unescape_value()
            .map_err(|err| malformed(position, err.to_string()))?;
        check_chars(&value, position)?;
    }

    Ok(name)
}

/// Reject characters outside the XML `Char` production.
fn check_chars(text: &str, position: u64) -> ParseResult<()> {
    match text.char_indices().find(|(_, c)| !is_xml_char(*c)) {
        Some((offset, c)) => Err(malformed(
            position + offset as u64,
            format!("illegal character U+{:04X}", c as u32),
        )),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Whether `name` matches the XML `Name` production.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

/// Text of one field element while it is being read.
struct FieldCapture {
    name: String,
    text: String,
    /// Text after a nested element does not belong to the field.
    saw_child: bool,
}

impl FieldCapture {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            saw_child: false,
        }
    }

    fn push(&mut self, text: &str) {
        if !self.saw_child {
            self.text.push_str(text);
        }
    }
}

/// Accumulates the child elements of one `<anime>` entry.
#[derive(Default)]
struct RecordBuilder {
    fields: HashMap<String, String>,
}

impl RecordBuilder {
    /// First occurrence of a child element wins.
    fn set(&mut self, name: String, text: String) {
        self.fields.entry(name).or_insert(text);
    }

    /// Trimmed text of a field, `None` when missing or empty.
    fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
    }

    fn owned(&self, name: &str) -> Option<String> {
        self.text(name).map(String::from)
    }

    fn build(self) -> SourceRecord {
        SourceRecord {
            title: self.owned("series_title").unwrap_or_default(),
            series_type: self.owned("series_type"),
            status: self.owned("my_status"),
            rewatching: coerce_int(self.text("my_rewatching"), 0) == 1,
            rewatch_episode: coerce_int(self.text("my_rewatching_ep"), 0),
            watched_episodes: coerce_int(self.text("my_watched_episodes"), 0),
            score: coerce_int(self.text("my_score"), 0),
            tags: self.owned("my_tags"),
            mal_id: self.owned("series_animedb_id"),
        }
    }
}
