// ============================================================
// CSV HEADER READER
// ============================================================
// Extract the header row from uploaded file bytes, with
// encoding detection for Japanese spreadsheet exports

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::SHIFT_JIS;
use tracing::{debug, warn};

use crate::domain::csv::HeaderRow;
use crate::domain::error::{AppError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads only the first record of a CSV file
#[derive(Debug, Clone)]
pub struct HeaderReader {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from header names
    trim: bool,
}

impl Default for HeaderReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl HeaderReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Read the header row of a file on disk
    pub fn read_header_file(&self, path: &Path) -> Result<HeaderRow> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.read_header_bytes(&bytes)
    }

    /// Read the header row from raw file content
    pub fn read_header_bytes(&self, bytes: &[u8]) -> Result<HeaderRow> {
        let content = decode_content(bytes);
        self.read_header_str(&content)
    }

    /// Read the header row from already decoded text
    pub fn read_header_str(&self, content: &str) -> Result<HeaderRow> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Err(AppError::ValidationError("CSV file is empty".to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut record = StringRecord::new();
        let found = reader.read_record(&mut record).map_err(|e| {
            AppError::ParseError(format!("Failed to read CSV headers: {}", e))
        })?;

        if !found {
            return Err(AppError::ValidationError(
                "CSV file has no header line".to_string(),
            ));
        }

        let columns: Vec<String> = record.iter().map(str::to_string).collect();
        debug!(columns = columns.len(), "Read CSV header row");

        Ok(HeaderRow::new(columns))
    }
}

/// Decode file content as UTF-8, falling back to Shift_JIS
fn decode_content(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Ok(content) = std::str::from_utf8(bytes) {
        return content.to_string();
    }

    let (content, _, had_errors) = SHIFT_JIS.decode(bytes);
    if had_errors {
        warn!("CSV content is neither valid UTF-8 nor Shift_JIS, decoded lossily");
    }

    content.into_owned()
}
