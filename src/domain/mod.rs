pub mod error;

// CSV header validation module
pub mod csv;
