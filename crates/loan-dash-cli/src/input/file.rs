use std::fs;
use std::path::PathBuf;

use loan_dash_core::aggregate::ViewRequest;

/// Read a view request from a JSON file, relative paths taken from the
/// working directory.
pub fn read_request(path: &str) -> Result<ViewRequest, Box<dyn std::error::Error>> {
    let path = PathBuf::from(path);
    let full = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };

    if !full.is_file() {
        return Err(format!("Request file not found: {}", full.display()).into());
    }
    let contents = fs::read_to_string(&full)
        .map_err(|e| format!("Failed to read '{}': {}", full.display(), e))?;
    super::parse_request(&contents, &format!("'{}'", full.display()))
}
