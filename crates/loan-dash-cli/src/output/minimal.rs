use serde_json::Value;

use super::{dashboard_view, format_cell, summary_fields};

/// Print just the key answer.
///
/// A view prints one `label: rate (month)` line per group; `extract` and
/// `describe` print the first well-known field present.
pub fn print_minimal(value: &Value) {
    if let Some(view) = dashboard_view(value) {
        match view.get("latest_rates").and_then(Value::as_array) {
            Some(latest) if !latest.is_empty() => {
                for entry in latest {
                    println!("{}", format_latest(entry));
                }
            }
            _ => println!("no rates"),
        }
        return;
    }

    let priority_keys = ["rows_kept", "last_month", "months"];
    if let Some(map) = summary_fields(value) {
        if let Some(val) = priority_keys.iter().find_map(|k| map.get(*k)) {
            println!("{}", format_cell(val));
        }
    }
}

fn format_latest(entry: &Value) -> String {
    let field = |k: &str| entry.get(k).map(format_cell).unwrap_or_default();
    format!("{}: {} ({})", field("label"), field("value"), field("period"))
}
