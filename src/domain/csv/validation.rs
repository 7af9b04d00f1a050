// ============================================================
// VALIDATION OUTCOMES
// ============================================================
// Result values of header validation and type identification

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TypeKey;

/// Outcome of checking a header row against one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Every required header is present
    Valid,

    /// At least one required header is missing
    Invalid,

    /// No required headers are configured, so nothing was checked
    #[default]
    Unknown,
}

impl ValidationStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationStatus::Valid)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::Invalid => "invalid",
            ValidationStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of identifying an unlabelled header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CsvMatch {
    Matched { type_key: TypeKey },
    NoMatch,
}

impl CsvMatch {
    pub fn type_key(&self) -> Option<&TypeKey> {
        match self {
            CsvMatch::Matched { type_key } => Some(type_key),
            CsvMatch::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.type_key().is_some()
    }
}

impl From<Option<TypeKey>> for CsvMatch {
    fn from(key: Option<TypeKey>) -> Self {
        match key {
            Some(type_key) => CsvMatch::Matched { type_key },
            None => CsvMatch::NoMatch,
        }
    }
}

/// Validation status plus the headers that caused an `Invalid` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderReport {
    pub status: ValidationStatus,

    /// Required headers absent from the row, in schema order
    pub missing: Vec<String>,
}

impl HeaderReport {
    pub fn unknown() -> Self {
        Self {
            status: ValidationStatus::Unknown,
            missing: Vec::new(),
        }
    }
}
