use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::DashboardError;
use crate::store::{Dataset, Period, Series};
use crate::types::{with_metadata, ComputationOutput, Unit};
use crate::DashboardResult;

const COMPONENTS_COLUMN: &str = "Components";
const VALUE_COLUMN: &str = "VALUE";
const UOM_COLUMN: &str = "UOM";
/// The date column is matched by substring: exports often prefix it with a
/// byte-order mark or quotes.
const MONTH_COLUMN_MARKER: &str = "REF_DATE";

/// Row counts from one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub skipped_no_component: usize,
    pub skipped_bad_month: usize,
    pub skipped_bad_value: usize,
    pub skipped_unknown_uom: usize,
    pub months: usize,
    pub series: usize,
    pub first_month: Option<Period>,
    pub last_month: Option<Period>,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub dataset: Dataset,
    pub summary: ExtractSummary,
}

struct Columns {
    month: usize,
    component: usize,
    value: usize,
    uom: usize,
}

fn column(headers: &csv::StringRecord, name: &str, pred: impl Fn(&str) -> bool) -> DashboardResult<usize> {
    headers
        .iter()
        .position(|h| pred(h.trim()))
        .ok_or_else(|| DashboardError::Parse(format!("CSV has no '{}' column", name)))
}

fn find_columns(headers: &csv::StringRecord) -> DashboardResult<Columns> {
    Ok(Columns {
        month: column(headers, MONTH_COLUMN_MARKER, |h| h.contains(MONTH_COLUMN_MARKER))?,
        component: column(headers, COMPONENTS_COLUMN, |h| h == COMPONENTS_COLUMN)?,
        value: column(headers, VALUE_COLUMN, |h| h == VALUE_COLUMN)?,
        uom: column(headers, UOM_COLUMN, |h| h == UOM_COLUMN)?,
    })
}

fn parse_value(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Turn a long-format statistical CSV (one observation per row) into the
/// month-aligned data file.
///
/// Rows without a component, with an unparsable month or value, or with a
/// unit other than Dollars/Percent are skipped. A repeated
/// (month, component, unit) keeps the last value seen.
pub fn extract_dataset<R: Read>(reader: R) -> DashboardResult<Extraction> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let cols = find_columns(rdr.headers()?)?;
    let mut summary = ExtractSummary::default();
    let mut months: BTreeSet<Period> = BTreeSet::new();
    let mut values: BTreeMap<(String, Unit), BTreeMap<Period, Decimal>> = BTreeMap::new();

    for record in rdr.records() {
        let record = record?;
        summary.rows_read += 1;

        let component = record.get(cols.component).unwrap_or("").trim();
        if component.is_empty() {
            summary.skipped_no_component += 1;
            continue;
        }
        let Some(month) = record.get(cols.month).and_then(|m| Period::parse(m).ok()) else {
            summary.skipped_bad_month += 1;
            continue;
        };
        let Some(value) = record.get(cols.value).and_then(parse_value) else {
            summary.skipped_bad_value += 1;
            continue;
        };
        let uom = record.get(cols.uom).unwrap_or("");
        let Some(unit) = Unit::from_uom(uom) else {
            warn!(component, uom, "skipping row with unsupported unit of measure");
            summary.skipped_unknown_uom += 1;
            continue;
        };

        months.insert(month.clone());
        values
            .entry((component.to_string(), unit))
            .or_default()
            .insert(month, value);
        summary.rows_kept += 1;
    }

    if summary.rows_kept == 0 {
        return Err(DashboardError::EmptyDataset(format!(
            "no valid rows among {} read",
            summary.rows_read
        )));
    }

    let months: Vec<Period> = months.into_iter().collect();
    let series = values
        .into_iter()
        .map(|((component, unit), by_month)| {
            let s = Series {
                data: months.iter().map(|m| by_month.get(m).copied()).collect(),
                component,
                uom: unit,
            };
            (s.key(), s)
        })
        .collect::<BTreeMap<_, _>>();

    summary.months = months.len();
    summary.series = series.len();
    summary.first_month = months.first().cloned();
    summary.last_month = months.last().cloned();

    info!(
        rows = summary.rows_kept,
        months = summary.months,
        series = summary.series,
        "extracted dataset"
    );

    Ok(Extraction {
        dataset: Dataset { months, series },
        summary,
    })
}

/// Read the CSV at `input`, write the JSON data file to `output`.
pub fn extract_file(input: &Path, output: &Path) -> DashboardResult<ComputationOutput<ExtractSummary>> {
    let started = Instant::now();
    let file = File::open(input).map_err(|e| DashboardError::Load {
        path: input.display().to_string(),
        reason: e.to_string(),
    })?;
    let extraction = extract_dataset(file)?;

    let json = serde_json::to_string(&extraction.dataset)?;
    fs::write(output, json).map_err(|e| DashboardError::Write {
        path: output.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut warnings = Vec::new();
    let s = &extraction.summary;
    let skipped = s.rows_read - s.rows_kept;
    if skipped > 0 {
        warnings.push(format!("{} of {} rows skipped", skipped, s.rows_read));
    }

    let assumptions = serde_json::json!({
        "input": input.display().to_string(),
        "output": output.display().to_string(),
        "month_column": MONTH_COLUMN_MARKER,
    });

    Ok(with_metadata(
        "Long-format CSV pivoted to month-aligned series keyed by component and unit",
        &assumptions,
        warnings,
        started.elapsed().as_micros() as u64,
        extraction.summary,
    ))
}
