pub mod use_cases;

pub use use_cases::csv_schema_validator::{
    identify_all, identify_csv_type, is_csv_match, missing_headers, validate_headers,
    CsvSchemaValidator,
};
pub use use_cases::upload_check::{UploadCheck, UploadOutcome};
pub use use_cases::upload_slots::{SlotState, SlotTicket, UploadSlots};
