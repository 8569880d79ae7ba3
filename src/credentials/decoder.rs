//! File decoders for bulk import
//!
//! Each decoder turns a fully materialized payload into raw records in
//! source order, keeping header strings verbatim. A malformed payload fails
//! the whole decode; there is no partial result.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use super::format::{DataFormat, FileFormat};
use super::types::RawRecord;
use crate::errors::{TranscodeError, TranscodeResult};
use crate::logger::{self, LogTag};

/// UTF-8 byte-order mark some spreadsheet tools prepend to CSV exports
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode a payload declared as `format` into raw records
pub fn decode(
    bytes: &[u8],
    format: FileFormat,
    xml_entry_tag: &str,
) -> TranscodeResult<Vec<RawRecord>> {
    let records = match format.data_format() {
        DataFormat::Csv => parse_csv(bytes)?,
        DataFormat::Spreadsheet => parse_excel(bytes)?,
        DataFormat::Xml => parse_xml(bytes, xml_entry_tag)?,
    };

    logger::debug(
        LogTag::Decode,
        &format!("Decoded {} raw records from {} payload", records.len(), format),
    );
    Ok(records)
}

/// Decode a payload whose format is given as a tag or extension
pub fn decode_tagged(
    bytes: &[u8],
    tag: &str,
    xml_entry_tag: &str,
) -> TranscodeResult<Vec<RawRecord>> {
    let format = FileFormat::from_tag(tag)?;
    decode(bytes, format, xml_entry_tag)
}

// =============================================================================
// CSV PARSING
// =============================================================================

/// Parse CSV content: first row is the header, every later row one record
///
/// Cells are trimmed and blank lines dropped. A row whose field count
/// differs from the header is malformed.
pub fn parse_csv(bytes: &[u8]) -> TranscodeResult<Vec<RawRecord>> {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TranscodeError::Decode(format!("Failed to parse CSV headers: {}", e)))?
        .iter()
        .map(|s| s.to_string())
        .collect();
    logger::verbose(LogTag::Decode, &format!("CSV headers: {}", headers.join(", ")));

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result.map_err(|e| {
            TranscodeError::Decode(format!("Failed to parse CSV row {}: {}", idx + 2, e))
        })?;
        records.push(
            headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| (header.as_str(), value))
                .collect(),
        );
    }

    Ok(records)
}

// =============================================================================
// EXCEL PARSING
// =============================================================================

/// Parse the first sheet of an .xlsx/.xlsm workbook
///
/// Row-to-object semantics: the first row is the header, empty cells
/// produce no key, rows without any value are dropped and columns with an
/// empty header are ignored. Repeated headers get a `_1`, `_2`, ... suffix
/// so the leftmost column keeps the plain name. Cell text is kept verbatim.
pub fn parse_excel(bytes: &[u8]) -> TranscodeResult<Vec<RawRecord>> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| TranscodeError::Decode(format!("Failed to open Excel file: {}", e)))?;

    let first_sheet = match workbook.sheet_names().first() {
        Some(name) => name.clone(),
        None => return Err(TranscodeError::decode("Excel file has no sheets")),
    };

    let range = workbook.worksheet_range(&first_sheet).map_err(|e| {
        TranscodeError::Decode(format!("Failed to read sheet '{}': {}", first_sheet, e))
    })?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(row) => dedupe_headers(
            row.iter()
                .map(|cell| cell_to_string(cell).trim().to_string())
                .collect(),
        ),
        None => return Ok(Vec::new()),
    };
    logger::verbose(
        LogTag::Decode,
        &format!("Sheet '{}' headers: {}", first_sheet, headers.join(", ")),
    );

    let mut records = Vec::new();
    for row in rows {
        let mut record = RawRecord::with_capacity(headers.len());
        for (header, cell) in headers.iter().zip(row.iter()) {
            let value = cell_to_string(cell);
            if header.is_empty() || value.is_empty() {
                continue;
            }
            record.insert(header.as_str(), value);
        }
        if !record.is_empty() {
            records.push(record);
        }
    }

    Ok(records)
}

/// Suffix repeated header names (`Name`, `Name_1`, `Name_2`)
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw.len());

    for header in raw {
        if header.is_empty() || !taken.contains(&header) {
            taken.insert(header.clone());
            headers.push(header);
            continue;
        }

        let counter = counters.entry(header.clone()).or_insert(0);
        let renamed = loop {
            *counter += 1;
            let candidate = format!("{}_{}", header, counter);
            if !taken.contains(&candidate) {
                break candidate;
            }
        };
        taken.insert(renamed.clone());
        headers.push(renamed);
    }

    headers
}

/// Convert Excel cell to string
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Handle integers stored as floats
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("ERROR: {:?}", e),
    }
}

// =============================================================================
// XML PARSING
// =============================================================================

/// Parse an XML document of the shape `<root><entry><field>text</field>...</entry>...</root>`
///
/// Every child of the root named `entry_tag` is one record; its child
/// elements are the fields, first occurrence wins. Other root children are
/// ignored. One entry and many entries decode the same way. Field text is
/// kept verbatim; whitespace between elements is layout and skipped.
pub fn parse_xml(bytes: &[u8], entry_tag: &str) -> TranscodeResult<Vec<RawRecord>> {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(content)
        .map_err(|e| TranscodeError::Decode(format!("XML payload is not valid UTF-8: {}", e)))?;

    let mut reader = XmlReader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<RawRecord> = None;
    // (field name, accumulated text) for the field element being read
    let mut field: Option<(String, String)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            TranscodeError::Decode(format!(
                "Failed to parse XML at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match depth {
                    1 => saw_root = check_single_root(saw_root)?,
                    2 if name == entry_tag => current = Some(RawRecord::new()),
                    3 if current.is_some() => field = Some((name, String::new())),
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match depth + 1 {
                    1 => saw_root = check_single_root(saw_root)?,
                    2 if name == entry_tag => records.push(RawRecord::new()),
                    3 => {
                        if let Some(record) = current.as_mut() {
                            record.insert_if_absent(name, String::new());
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                let unescaped = e.unescape().map_err(TranscodeError::decode)?;
                match field.as_mut() {
                    Some((_, value)) if depth == 3 => value.push_str(&unescaped),
                    _ if depth == 0 && !unescaped.trim().is_empty() => {
                        return Err(TranscodeError::decode(
                            "Text content outside of the root element",
                        ));
                    }
                    _ => {}
                }
            }
            Event::CData(e) => {
                if depth == 3 {
                    if let Some((_, value)) = field.as_mut() {
                        value.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
            }
            Event::End(_) => {
                match depth {
                    3 => {
                        if let (Some(record), Some((name, value))) =
                            (current.as_mut(), field.take())
                        {
                            record.insert_if_absent(name, value);
                        }
                    }
                    2 => {
                        if let Some(record) = current.take() {
                            records.push(record);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(TranscodeError::decode("XML document has no root element"));
    }
    if depth != 0 {
        return Err(TranscodeError::decode(
            "XML document ended before all elements were closed",
        ));
    }

    Ok(records)
}

fn check_single_root(saw_root: bool) -> TranscodeResult<bool> {
    if saw_root {
        return Err(TranscodeError::decode("XML document has more than one root element"));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_csv_basic() {
        let csv = "Name,Password,Notes\nMail, hunter2 ,Test\nBank,iv:ct,\n";
        let records = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Name"), Some("Mail"));
        assert_eq!(records[0].get("Password"), Some("hunter2"));
        assert_eq!(records[1].get("Notes"), Some(""));
    }

    #[test]
    fn parse_csv_keeps_header_spelling() {
        let records = parse_csv(b"Site, User Email ,Pwd\nx,y,z\n").unwrap();
        let headers: Vec<_> = records[0].headers().collect();
        assert_eq!(headers, vec!["Site", "User Email", "Pwd"]);
    }

    #[test]
    fn parse_csv_drops_empty_lines_and_bom() {
        let csv = "\u{feff}title,url\n\na,b\n\n\nc,d\n";
        let records = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("title"), Some("a"));
    }

    #[test]
    fn parse_csv_handles_quoted_fields() {
        let csv = "title,notes\n\"Acme, Inc\",\"line1\nline2 \"\"quoted\"\"\"\n";
        let records = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].get("title"), Some("Acme, Inc"));
        assert_eq!(records[0].get("notes"), Some("line1\nline2 \"quoted\""));
    }

    #[test]
    fn parse_csv_rejects_ragged_rows() {
        let err = parse_csv(b"title,url\na,b,c\n").unwrap_err();
        assert!(matches!(err, TranscodeError::Decode(ref m) if m.contains("row 2")));
    }

    #[test]
    fn parse_csv_rejects_invalid_utf8() {
        assert!(parse_csv(b"title\n\xff\xfe\n").is_err());
    }

    #[test]
    fn parse_excel_rejects_garbage() {
        let err = parse_excel(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, TranscodeError::Decode(_)));
    }

    #[test]
    fn parse_xml_single_entry() {
        let xml = r#"<?xml version="1.0"?>
            <passwords>
              <entry><title>Mail</title><password>abc</password></entry>
            </passwords>"#;
        let records = parse_xml(xml.as_bytes(), "entry").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("title"), Some("Mail"));
        assert_eq!(records[0].get("password"), Some("abc"));
    }

    #[test]
    fn parse_xml_multiple_entries_with_missing_fields() {
        let xml = "<passwords>\
            <entry><title>A</title><url>https://a.io</url></entry>\
            <entry><title>B</title></entry>\
            </passwords>";
        let records = parse_xml(xml.as_bytes(), "entry").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("url"), None);
    }

    #[test]
    fn parse_xml_first_occurrence_wins_and_text_is_unescaped() {
        let xml = "<passwords><entry>\
            <title>Tom &amp; Jerry</title><title>ignored</title>\
            <notes><![CDATA[<raw>]]></notes>\
            <email/>\
            </entry></passwords>";
        let records = parse_xml(xml.as_bytes(), "entry").unwrap();
        assert_eq!(records[0].get("title"), Some("Tom & Jerry"));
        assert_eq!(records[0].get("notes"), Some("<raw>"));
        assert_eq!(records[0].get("email"), Some(""));
    }

    #[test]
    fn parse_xml_ignores_foreign_root_children() {
        let xml = "<vault><meta><title>x</title></meta><entry><title>A</title></entry></vault>";
        let records = parse_xml(xml.as_bytes(), "entry").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("title"), Some("A"));
    }

    #[test]
    fn parse_xml_empty_root_yields_no_records() {
        assert!(parse_xml(b"<passwords/>", "entry").unwrap().is_empty());
        assert!(parse_xml(b"<passwords></passwords>", "entry").unwrap().is_empty());
    }

    #[test]
    fn parse_xml_rejects_malformed_documents() {
        assert!(parse_xml(b"", "entry").is_err());
        assert!(parse_xml(b"<passwords><entry></passwords>", "entry").is_err());
        assert!(parse_xml(b"<passwords><entry>", "entry").is_err());
        assert!(parse_xml(b"<a/><b/>", "entry").is_err());
    }

    #[test]
    fn decode_tagged_rejects_unknown_format() {
        let err = decode_tagged(b"whatever", "pdf", "entry").unwrap_err();
        assert!(matches!(err, TranscodeError::UnsupportedFormat(_)));
    }

    #[test]
    fn parse_xml_keeps_field_text_verbatim() {
        let xml = "<passwords>\n  <entry>\n    <title> Mail </title>\n    \
            <password>  pa ss  </password>\n  </entry>\n</passwords>\n";
        let records = parse_xml(xml.as_bytes(), "entry").unwrap();
        assert_eq!(records[0].get("title"), Some(" Mail "));
        assert_eq!(records[0].get("password"), Some("  pa ss  "));
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn parse_xml_rejects_text_outside_root() {
        assert!(parse_xml(b"<passwords/>stray", "entry").is_err());
        assert!(parse_xml(b"  <passwords/>  \n", "entry").is_ok());
    }

    #[test]
    fn dedupe_headers_suffixes_repeats() {
        let headers = dedupe_headers(
            ["a", "a", "", "", "a_1", "a"].iter().map(|s| s.to_string()).collect(),
        );
        assert_eq!(headers, vec!["a", "a_1", "", "", "a_1_1", "a_2"]);
    }
}
