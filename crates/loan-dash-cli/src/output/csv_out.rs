use serde_json::{Map, Value};
use std::io;

use super::{dashboard_view, format_cell, summary_fields};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(view) = dashboard_view(value) {
        write_view_csv(&mut wtr, view);
    } else if let Some(fields) = summary_fields(value) {
        write_fields(&mut wtr, fields);
    }

    let _ = wtr.flush();
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_cell(val)]);
    }
}

/// Long format: one row per (month, group) with amount and rate columns.
fn write_view_csv<W: io::Write>(wtr: &mut csv::Writer<W>, view: &Map<String, Value>) {
    let empty = Vec::new();
    let periods = view.get("periods").and_then(Value::as_array).unwrap_or(&empty);
    let groups = view.get("groups").and_then(Value::as_array).unwrap_or(&empty);

    let _ = wtr.write_record(["month", "group", "amount", "rate"]);
    for g in groups {
        let label = g.get("label").map(format_cell).unwrap_or_default();
        let at = |field: &str, i: usize| {
            g.get(field)
                .and_then(|s| s.get(i))
                .map(format_cell)
                .unwrap_or_default()
        };
        for (i, period) in periods.iter().enumerate() {
            let _ = wtr.write_record([
                format_cell(period),
                label.clone(),
                at("amount_series", i),
                at("rate_series", i),
            ]);
        }
    }
}
