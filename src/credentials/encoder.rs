//! File encoders for bulk export
//!
//! Every format writes the same six columns in the same order (title,
//! email, username, encrypted_password, url, notes), with absent values as
//! empty strings, so any export can be imported again.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer as XmlWriter;

use super::format::{DataFormat, FileFormat};
use super::types::{CanonicalCredentialRecord, CanonicalField, ExportPayload};
use super::workbook;
use crate::config::ExportConfig;
use crate::errors::{TranscodeError, TranscodeResult};
use crate::logger::{self, LogTag};

/// Header row shared by all formats
pub fn export_headers() -> [&'static str; 6] {
    CanonicalField::ALL.map(|field| field.export_header())
}

/// Encode records (already filtered to one owner) into `format`
///
/// Fails with `NothingToExport` before doing any work when `records` is empty.
pub fn encode(
    records: &[CanonicalCredentialRecord],
    format: FileFormat,
    config: &ExportConfig,
) -> TranscodeResult<ExportPayload> {
    if records.is_empty() {
        return Err(TranscodeError::NothingToExport);
    }

    let bytes = match format.data_format() {
        DataFormat::Csv => write_csv(records)?,
        DataFormat::Spreadsheet => workbook::write_workbook(records, format, &config.sheet_name)?,
        DataFormat::Xml => write_xml(records, &config.xml_root_tag, &config.xml_entry_tag)?,
    };

    logger::debug(
        LogTag::Export,
        &format!("Encoded {} records as {} ({} bytes)", records.len(), format, bytes.len()),
    );

    Ok(ExportPayload {
        bytes,
        content_type: format.content_type(),
        filename: format.export_filename(&config.file_basename),
    })
}

/// Encode records into a format given as a tag or extension
pub fn encode_tagged(
    records: &[CanonicalCredentialRecord],
    tag: &str,
    config: &ExportConfig,
) -> TranscodeResult<ExportPayload> {
    if records.is_empty() {
        return Err(TranscodeError::NothingToExport);
    }
    let format = FileFormat::from_tag(tag)?;
    encode(records, format, config)
}

// =============================================================================
// CSV
// =============================================================================

/// Header row plus one row per record, quoting only where needed
pub fn write_csv(records: &[CanonicalCredentialRecord]) -> TranscodeResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(export_headers())
        .map_err(|e| TranscodeError::Encode(format!("csv header: {}", e)))?;

    for record in records {
        writer
            .write_record(record.export_row())
            .map_err(|e| TranscodeError::Encode(format!("csv row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| TranscodeError::Encode(format!("csv flush: {}", e)))
}

// =============================================================================
// XML
// =============================================================================

/// `<root><entry><title>..</title>...</entry>...</root>` with a UTF-8 declaration
pub fn write_xml(
    records: &[CanonicalCredentialRecord],
    root_tag: &str,
    entry_tag: &str,
) -> TranscodeResult<Vec<u8>> {
    let mut writer = XmlWriter::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(TranscodeError::encode)?;
    writer
        .write_event(Event::Start(BytesStart::new(root_tag)))
        .map_err(TranscodeError::encode)?;

    for record in records {
        writer
            .write_event(Event::Start(BytesStart::new(entry_tag)))
            .map_err(TranscodeError::encode)?;

        for (header, value) in export_headers().iter().zip(record.export_row()) {
            let value = sanitize_xml_text(value);
            if value.is_empty() {
                writer
                    .write_event(Event::Empty(BytesStart::new(*header)))
                    .map_err(TranscodeError::encode)?;
                continue;
            }
            writer
                .write_event(Event::Start(BytesStart::new(*header)))
                .map_err(TranscodeError::encode)?;
            writer
                .write_event(Event::Text(BytesText::new(&value)))
                .map_err(TranscodeError::encode)?;
            writer
                .write_event(Event::End(BytesEnd::new(*header)))
                .map_err(TranscodeError::encode)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(entry_tag)))
            .map_err(TranscodeError::encode)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(root_tag)))
        .map_err(TranscodeError::encode)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Drop characters XML 1.0 cannot represent (control chars other than tab/CR/LF)
pub(crate) fn sanitize_xml_text(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}
