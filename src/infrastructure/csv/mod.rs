// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Header extraction and encoding detection

mod header_reader;

pub use header_reader::HeaderReader;
