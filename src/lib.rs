//! CSV header validation and type identification for the reporting
//! dashboard's upload flow.
//!
//! The core lives in [`application::use_cases::csv_schema_validator`]: pure
//! functions over a [`domain::csv::HeaderRow`] and a
//! [`domain::csv::SchemaRegistry`]. Everything else reads files, loads the
//! registry from configuration or serves the checks over HTTP.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

mod app;

pub use app::{build_state, init_tracing, run};
pub use application::{
    identify_csv_type, is_csv_match, validate_headers, CsvSchemaValidator, UploadCheck,
};
pub use domain::csv::{CsvMatch, HeaderRow, SchemaDefinition, SchemaRegistry, TypeKey, ValidationStatus};
pub use domain::error::{AppError, Result};
