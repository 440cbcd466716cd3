pub mod csv_source;

pub use csv_source::{extract_dataset, extract_file, ExtractSummary, Extraction};
