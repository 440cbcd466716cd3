pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The aggregated view inside a `view` envelope.
fn dashboard_view(value: &Value) -> Option<&Map<String, Value>> {
    value
        .get("result")?
        .as_object()
        .filter(|r| r.contains_key("periods") && r.contains_key("groups"))
}

/// Fields to print for `extract` (envelope result) and `describe` (bare summary).
fn summary_fields(value: &Value) -> Option<&Map<String, Value>> {
    value.get("result").unwrap_or(value).as_object()
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
