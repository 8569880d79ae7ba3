//! Format tags for import and export
//!
//! Maps file extensions to the decoder/encoder family and owns the
//! content-type and filename conventions of exported files.

use crate::constants::{CONTENT_TYPE_CSV, CONTENT_TYPE_XLSM, CONTENT_TYPE_XML, CONTENT_TYPE_XLSX};
use crate::errors::TranscodeError;
use std::str::FromStr;

/// A concrete file format accepted on import and produced on export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xlsm,
    Xml,
}

/// Decoder/encoder family a file format belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Csv,
    Spreadsheet,
    Xml,
}

impl FileFormat {
    pub const ALL: [FileFormat; 4] = [
        FileFormat::Csv,
        FileFormat::Xlsx,
        FileFormat::Xlsm,
        FileFormat::Xml,
    ];

    /// Parse a format tag or extension (`csv`, `.XLSX`, ...)
    pub fn from_tag(tag: &str) -> Result<Self, TranscodeError> {
        let normalized = tag.trim().trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "xlsm" => Ok(FileFormat::Xlsm),
            "xml" => Ok(FileFormat::Xml),
            _ => Err(TranscodeError::UnsupportedFormat(tag.trim().to_string())),
        }
    }

    /// Detect the format from a filename's last extension (`dump.CSV`)
    pub fn from_filename(filename: &str) -> Result<Self, TranscodeError> {
        match filename.rsplit_once('.') {
            Some((_, extension)) => FileFormat::from_tag(extension),
            None => Err(TranscodeError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xlsm => "xlsm",
            FileFormat::Xml => "xml",
        }
    }

    pub fn data_format(&self) -> DataFormat {
        match self {
            FileFormat::Csv => DataFormat::Csv,
            FileFormat::Xlsx | FileFormat::Xlsm => DataFormat::Spreadsheet,
            FileFormat::Xml => DataFormat::Xml,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            FileFormat::Csv => CONTENT_TYPE_CSV,
            FileFormat::Xlsx => CONTENT_TYPE_XLSX,
            FileFormat::Xlsm => CONTENT_TYPE_XLSM,
            FileFormat::Xml => CONTENT_TYPE_XML,
        }
    }

    /// Suggested export filename, e.g. `safepass_export.xlsx`
    pub fn export_filename(&self, basename: &str) -> String {
        format!("{}.{}", basename, self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileFormat::from_tag(s)
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
