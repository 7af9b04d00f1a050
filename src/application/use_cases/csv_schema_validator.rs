// ============================================================
// CSV SCHEMA VALIDATOR
// ============================================================
// Decide whether a header row satisfies a schema, and which
// registered schema an unlabelled header row belongs to

use std::sync::Arc;

use tracing::debug;

use crate::domain::csv::{
    CsvMatch, HeaderReport, HeaderRow, SchemaRegistry, TypeKey, ValidationStatus,
};

/// Check a header row against a list of required headers.
///
/// `None` or an empty list means nothing is configured and yields
/// `Unknown`. Otherwise the row is `Valid` when it contains every
/// required header, in any position. A malformed row is always `Invalid`.
pub fn validate_headers(header_row: &HeaderRow, required_headers: Option<&[String]>) -> ValidationStatus {
    let required = match required_headers {
        Some(required) if !required.is_empty() => required,
        _ => return ValidationStatus::Unknown,
    };

    if header_row.is_malformed() {
        return ValidationStatus::Invalid;
    }

    let columns = header_row.column_set();
    if required.iter().all(|h| columns.contains(h.as_str())) {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Invalid
    }
}

/// Required headers absent from the row, in required order.
pub fn missing_headers(header_row: &HeaderRow, required_headers: &[String]) -> Vec<String> {
    let columns = header_row.column_set();
    required_headers
        .iter()
        .filter(|h| !columns.contains(h.as_str()))
        .cloned()
        .collect()
}

/// Every schema the row satisfies, in registry order.
pub fn identify_all(header_row: &HeaderRow, registry: &SchemaRegistry) -> Vec<TypeKey> {
    let matches: Vec<TypeKey> = registry
        .iter()
        .filter(|schema| {
            validate_headers(header_row, Some(schema.required_headers.as_slice())).is_valid()
        })
        .map(|schema| schema.type_key.clone())
        .collect();

    if matches.len() > 1 {
        debug!(
            candidates = ?matches,
            chosen = %matches[0],
            "Header row matches several schemas, using registry order"
        );
    }

    matches
}

/// Infer the schema of an unlabelled header row.
///
/// When several schemas match, the first one in registry order wins.
pub fn identify_csv_type(header_row: &HeaderRow, registry: &SchemaRegistry) -> CsvMatch {
    CsvMatch::from(identify_all(header_row, registry).into_iter().next())
}

/// `true` when `type_key` is registered and the row satisfies it.
pub fn is_csv_match(header_row: &HeaderRow, type_key: &str, registry: &SchemaRegistry) -> bool {
    match registry.get(type_key) {
        Some(schema) => validate_headers(header_row, Some(schema.required_headers.as_slice())).is_valid(),
        None => false,
    }
}

/// Validator bound to one registry.
#[derive(Debug, Clone)]
pub struct CsvSchemaValidator {
    registry: Arc<SchemaRegistry>,
}

impl CsvSchemaValidator {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// Validator over the built-in shipment/yard registry
    pub fn builtin() -> Self {
        Self::new(Arc::new(SchemaRegistry::builtin().clone()))
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Status and missing headers for one named type.
    ///
    /// An unregistered type has no requirements, so it reports `Unknown`.
    pub fn validate_type(&self, header_row: &HeaderRow, type_key: &str) -> HeaderReport {
        let Some(schema) = self.registry.get(type_key) else {
            debug!(type_key, "No schema registered for type, skipping validation");
            return HeaderReport::unknown();
        };

        let status = validate_headers(header_row, Some(schema.required_headers.as_slice()));
        let missing = match status {
            ValidationStatus::Invalid => missing_headers(header_row, &schema.required_headers),
            _ => Vec::new(),
        };

        HeaderReport { status, missing }
    }

    pub fn identify(&self, header_row: &HeaderRow) -> CsvMatch {
        identify_csv_type(header_row, &self.registry)
    }

    pub fn candidates(&self, header_row: &HeaderRow) -> Vec<TypeKey> {
        identify_all(header_row, &self.registry)
    }

    pub fn is_match(&self, header_row: &HeaderRow, type_key: &str) -> bool {
        is_csv_match(header_row, type_key, &self.registry)
    }
}
