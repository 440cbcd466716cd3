use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{dashboard_view, format_cell, summary_fields};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(view) = dashboard_view(value) {
        print_view_tables(view);
    } else if let Some(fields) = summary_fields(value) {
        print_fields(fields);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// One row per month, one amount and one rate column per group.
fn print_view_tables(view: &Map<String, Value>) {
    let empty = Vec::new();
    let periods = view.get("periods").and_then(Value::as_array).unwrap_or(&empty);
    let groups = view.get("groups").and_then(Value::as_array).unwrap_or(&empty);

    if groups.is_empty() {
        println!("(no matching series)");
        return;
    }

    let mut header = vec!["Month".to_string()];
    for g in groups {
        let label = g.get("label").map(format_cell).unwrap_or_default();
        header.push(format!("{} ($B)", label));
        header.push(format!("{} (%)", label));
    }

    let mut builder = Builder::default();
    builder.push_record(header);
    for (i, period) in periods.iter().enumerate() {
        let mut row = vec![format_cell(period)];
        for g in groups {
            row.push(series_cell(g, "amount_series", i));
            row.push(series_cell(g, "rate_series", i));
        }
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(latest)) = view.get("latest_rates") {
        if !latest.is_empty() {
            println!("\nLatest rates:");
            let mut builder = Builder::default();
            builder.push_record(["Group", "Month", "Rate (%)"]);
            for entry in latest {
                let cell = |k: &str| entry.get(k).map(format_cell).unwrap_or_default();
                builder.push_record([cell("label"), cell("period"), cell("value")]);
            }
            println!("{}", Table::from(builder));
        }
    }
}

fn series_cell(group: &Value, field: &str, index: usize) -> String {
    group
        .get(field)
        .and_then(|s| s.get(index))
        .map(format_cell)
        .unwrap_or_default()
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}
