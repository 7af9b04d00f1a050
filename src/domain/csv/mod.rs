// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types and value objects for CSV header validation
// No I/O, no async

mod header_row;
mod registry;
mod schema;
mod validation;

pub use header_row::HeaderRow;
pub use registry::SchemaRegistry;
pub use schema::{BuiltinCsvType, SchemaDefinition, TypeKey};
pub use validation::{CsvMatch, HeaderReport, ValidationStatus};
