// ============================================================
// UPLOAD CHECK USE CASE
// ============================================================
// Read the header of an uploaded file and run it through the
// schema validator, translating read failures into statuses

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::csv_schema_validator::CsvSchemaValidator;
use crate::domain::csv::{CsvMatch, HeaderRow, TypeKey, ValidationStatus};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::HeaderReader;

/// What the upload form needs to render one file slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// Header row as read from the file (empty if it could not be read)
    pub headers: HeaderRow,

    pub status: ValidationStatus,

    /// Required headers of the expected type missing from the file
    pub missing: Vec<String>,

    /// Type inferred from the headers, independent of the expected type
    pub detected: CsvMatch,

    /// Why the file could not be checked, if it could not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadOutcome {
    fn unreadable(status: ValidationStatus, error: &AppError) -> Self {
        Self {
            headers: HeaderRow::default(),
            status,
            missing: Vec::new(),
            detected: CsvMatch::NoMatch,
            error: Some(error.to_string()),
        }
    }
}

/// Upload check use case
#[derive(Debug, Clone)]
pub struct UploadCheck {
    reader: HeaderReader,
    validator: CsvSchemaValidator,
}

impl UploadCheck {
    pub fn new(reader: HeaderReader, validator: CsvSchemaValidator) -> Self {
        Self { reader, validator }
    }

    pub fn validator(&self) -> &CsvSchemaValidator {
        &self.validator
    }

    /// Check raw file content.
    ///
    /// With an expected type the status is that type's validation status.
    /// Without one the file is `Valid` when any registered type matches.
    pub fn check_bytes(&self, bytes: &[u8], expected: Option<&TypeKey>) -> UploadOutcome {
        self.check_read(self.reader.read_header_bytes(bytes), expected)
    }

    pub fn check_file(&self, path: &Path, expected: Option<&TypeKey>) -> UploadOutcome {
        self.check_read(self.reader.read_header_file(path), expected)
    }

    /// Check an already extracted header row
    pub fn check_headers(&self, headers: HeaderRow, expected: Option<&TypeKey>) -> UploadOutcome {
        let detected = self.validator.identify(&headers);

        let (status, missing) = match expected {
            Some(type_key) => {
                let report = self.validator.validate_type(&headers, type_key.as_str());
                (report.status, report.missing)
            }
            None if detected.is_match() => (ValidationStatus::Valid, Vec::new()),
            None => (ValidationStatus::Invalid, Vec::new()),
        };

        info!(
            expected = expected.map(TypeKey::as_str).unwrap_or("-"),
            detected = detected.type_key().map(TypeKey::as_str).unwrap_or("-"),
            status = %status,
            "Checked CSV upload"
        );

        UploadOutcome {
            headers,
            status,
            missing,
            detected,
            error: None,
        }
    }

    fn check_read(&self, read: Result<HeaderRow>, expected: Option<&TypeKey>) -> UploadOutcome {
        match read {
            Ok(headers) => self.check_headers(headers, expected),
            Err(err) => {
                let status = read_failure_status(&err);
                warn!(error = %err, status = %status, "Could not read CSV header");
                UploadOutcome::unreadable(status, &err)
            }
        }
    }
}

/// An empty or unparsable file can never satisfy a schema; a failed read
/// says nothing about the file itself.
fn read_failure_status(err: &AppError) -> ValidationStatus {
    match err {
        AppError::ValidationError(_) | AppError::ParseError(_) => ValidationStatus::Invalid,
        _ => ValidationStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::BuiltinCsvType;

    fn use_case() -> UploadCheck {
        UploadCheck::new(HeaderReader::new(), CsvSchemaValidator::builtin())
    }

    const YARD_CSV: &str = "伝票日付,取引先名,品名,正味重量,数量,備考\n2024/01/05,A社,鉄くず,120.5,3,\n";

    #[test]
    fn test_expected_type_drives_status() {
        let check = use_case();
        let yard = TypeKey::from(BuiltinCsvType::Yard);
        let shipment = TypeKey::from(BuiltinCsvType::Shipment);

        let as_yard = check.check_bytes(YARD_CSV.as_bytes(), Some(&yard));
        assert_eq!(as_yard.status, ValidationStatus::Valid);
        assert_eq!(as_yard.detected, CsvMatch::from(Some(yard.clone())));
        assert!(as_yard.error.is_none());

        let as_shipment = check.check_bytes(YARD_CSV.as_bytes(), Some(&shipment));
        assert_eq!(as_shipment.status, ValidationStatus::Invalid);
        assert_eq!(as_shipment.missing, vec!["出荷番号", "業者CD", "業者名"]);
        assert_eq!(as_shipment.detected, CsvMatch::from(Some(yard)));
    }

    #[test]
    fn test_without_expected_type_uses_identification() {
        let check = use_case();

        let known = check.check_bytes(YARD_CSV.as_bytes(), None);
        assert_eq!(known.status, ValidationStatus::Valid);

        let unknown = check.check_bytes("日付,番号,会社名\n".as_bytes(), None);
        assert_eq!(unknown.status, ValidationStatus::Invalid);
        assert_eq!(unknown.detected, CsvMatch::NoMatch);
    }

    #[test]
    fn test_unregistered_expected_type_is_unknown() {
        let check = use_case();
        let outcome = check.check_bytes(YARD_CSV.as_bytes(), Some(&TypeKey::from("receive")));
        assert_eq!(outcome.status, ValidationStatus::Unknown);
    }

    #[test]
    fn test_empty_file_is_invalid() {
        let outcome = use_case().check_bytes(b"", Some(&TypeKey::from("yard")));
        assert_eq!(outcome.status, ValidationStatus::Invalid);
        assert!(outcome.headers.is_empty());
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_unreadable_file_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = use_case().check_file(&dir.path().join("gone.csv"), Some(&TypeKey::from("yard")));
        assert_eq!(outcome.status, ValidationStatus::Unknown);
        assert!(outcome.error.is_some());
    }
}
