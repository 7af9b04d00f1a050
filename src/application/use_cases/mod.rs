pub mod csv_schema_validator;
pub mod upload_check;
pub mod upload_slots;
