//! Minimal OOXML workbook writer
//!
//! Produces a single-sheet xlsx or xlsm package with inline string cells.
//! The two formats share the same parts; only the workbook content type
//! differs.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::encoder::{export_headers, sanitize_xml_text};
use super::format::FileFormat;
use super::types::CanonicalCredentialRecord;
use crate::errors::{TranscodeError, TranscodeResult};

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_DOCUMENT_RELS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_SHEETML: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_SHEETML: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml";

const WORKBOOK_MAIN_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKBOOK_MAIN_XLSM: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

/// Excel rejects sheet names longer than this
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Build the zipped workbook for `records` under `sheet_name`
pub fn write_workbook(
    records: &[CanonicalCredentialRecord],
    format: FileFormat,
    sheet_name: &str,
) -> TranscodeResult<Vec<u8>> {
    let rows: Vec<Vec<&str>> = records.iter().map(|r| r.export_row().to_vec()).collect();
    write_table(&export_headers(), &rows, format, sheet_name)
}

/// Build a single-sheet workbook from a header row and data rows
pub(crate) fn write_table(
    headers: &[&str],
    rows: &[Vec<&str>],
    format: FileFormat,
    sheet_name: &str,
) -> TranscodeResult<Vec<u8>> {
    let main_content_type = match format {
        FileFormat::Xlsm => WORKBOOK_MAIN_XLSM,
        FileFormat::Xlsx => WORKBOOK_MAIN_XLSX,
        other => {
            return Err(TranscodeError::Encode(format!(
                "{} is not a spreadsheet format",
                other
            )))
        }
    };

    let sheet_name = sanitize_sheet_name(sheet_name);
    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", content_types_xml(main_content_type)),
        ("_rels/.rels", root_rels_xml()),
        ("xl/workbook.xml", workbook_xml(&sheet_name)),
        ("xl/_rels/workbook.xml.rels", workbook_rels_xml()),
        ("xl/styles.xml", styles_xml()),
        ("xl/worksheets/sheet1.xml", sheet_xml(headers, rows)),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, body) in parts.iter() {
        zip.start_file(*path, options)
            .map_err(|e| TranscodeError::Encode(format!("workbook part {}: {}", path, e)))?;
        zip.write_all(body.as_bytes())
            .map_err(|e| TranscodeError::Encode(format!("workbook part {}: {}", path, e)))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| TranscodeError::Encode(format!("workbook finish: {}", e)))?;
    Ok(cursor.into_inner())
}

/// Replace characters Excel forbids in sheet names and cap the length
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .filter(|c| !c.is_control())
        .take(MAX_SHEET_NAME_CHARS)
        .collect();

    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

/// Zero-based column index to spreadsheet letters (0 -> A, 26 -> AA)
pub fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

// =============================================================================
// PACKAGE PARTS
// =============================================================================

fn content_types_xml(main_content_type: &str) -> String {
    format!(
        "{XML_DECL}<Types xmlns=\"{NS_CONTENT_TYPES}\">\
<Default Extension=\"rels\" ContentType=\"{CT_RELATIONSHIPS}\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/xl/workbook.xml\" ContentType=\"{main_content_type}\"/>\
<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"{CT_SHEETML}.worksheet+xml\"/>\
<Override PartName=\"/xl/styles.xml\" ContentType=\"{CT_SHEETML}.styles+xml\"/>\
</Types>"
    )
}

fn root_rels_xml() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{NS_PACKAGE_RELS}\">\
<Relationship Id=\"rId1\" Type=\"{NS_DOCUMENT_RELS}/officeDocument\" \
Target=\"xl/workbook.xml\"/>\
</Relationships>"
    )
}

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        "{XML_DECL}<workbook xmlns=\"{NS_SHEETML}\" xmlns:r=\"{NS_DOCUMENT_RELS}\">\
<sheets><sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/></sheets>\
</workbook>",
        escape(sheet_name)
    )
}

fn workbook_rels_xml() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{NS_PACKAGE_RELS}\">\
<Relationship Id=\"rId1\" Type=\"{NS_DOCUMENT_RELS}/worksheet\" \
Target=\"worksheets/sheet1.xml\"/>\
<Relationship Id=\"rId2\" Type=\"{NS_DOCUMENT_RELS}/styles\" Target=\"styles.xml\"/>\
</Relationships>"
    )
}

fn styles_xml() -> String {
    format!(
        "{XML_DECL}<styleSheet xmlns=\"{NS_SHEETML}\">\
<fonts count=\"1\"><font><sz val=\"11\"/><name val=\"Calibri\"/></font></fonts>\
<fills count=\"1\"><fill><patternFill patternType=\"none\"/></fill></fills>\
<borders count=\"1\"><border><left/><right/><top/><bottom/><diagonal/></border></borders>\
<cellStyleXfs count=\"1\">\
<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>\
<cellXfs count=\"1\">\
<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/></cellXfs>\
</styleSheet>"
    )
}

fn sheet_xml(headers: &[&str], rows: &[Vec<&str>]) -> String {
    let mut xml = String::with_capacity(256 + rows.len() * 256);
    xml.push_str(XML_DECL);
    xml.push_str(&format!("<worksheet xmlns=\"{NS_SHEETML}\"><sheetData>"));

    push_row(&mut xml, 1, headers);
    for (idx, row) in rows.iter().enumerate() {
        push_row(&mut xml, idx + 2, row);
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Every column gets a cell; absent values are written as empty strings
fn push_row(xml: &mut String, row_number: usize, values: &[&str]) {
    xml.push_str(&format!("<row r=\"{}\">", row_number));
    for (col, value) in values.iter().enumerate() {
        let value = sanitize_xml_text(value);
        xml.push_str(&format!(
            "<c r=\"{}{}\" t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
            column_letter(col),
            row_number,
            escape(value.as_str())
        ));
    }
    xml.push_str("</row>");
}
