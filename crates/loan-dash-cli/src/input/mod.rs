pub mod file;
pub mod stdin;

use loan_dash_core::aggregate::ViewRequest;

/// Parse a JSON view request, naming where it came from on failure.
fn parse_request(text: &str, source: &str) -> Result<ViewRequest, Box<dyn std::error::Error>> {
    let request = serde_json::from_str(text)
        .map_err(|e| format!("Invalid view request in {}: {}", source, e))?;
    Ok(request)
}
