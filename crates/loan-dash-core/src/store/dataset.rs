use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::DashboardError;
use crate::store::period::{validate_periods, Period};
use crate::types::Unit;
use crate::DashboardResult;

/// Separator between the component label and the UOM in a series key.
pub const KEY_SEPARATOR: &str = "___";

/// Composite key `"<label>___<uom>"` used by the data file.
pub fn series_key(label: &str, unit: Unit) -> String {
    format!("{}{}{}", label, KEY_SEPARATOR, unit.uom())
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One series as stored in the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Raw category label, e.g. "Outstanding balances, residential mortgages, insured, variable rate"
    pub component: String,
    pub uom: Unit,
    /// One slot per period; gaps are explicit nulls.
    pub data: Vec<Option<Decimal>>,
}

impl Series {
    pub fn key(&self) -> String {
        series_key(&self.component, self.uom)
    }

    pub fn value_at(&self, index: usize) -> Option<Decimal> {
        self.data.get(index).copied().flatten()
    }

    pub fn observation_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_some()).count()
    }
}

/// The data file produced by the extraction step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub months: Vec<Period>,
    pub series: BTreeMap<String, Series>,
}

// ---------------------------------------------------------------------------
// SeriesStore
// ---------------------------------------------------------------------------

/// Validated, read-only view over a loaded dataset.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    periods: Vec<Period>,
    series: BTreeMap<String, Series>,
}

impl SeriesStore {
    /// Validate a dataset and take ownership of it.
    pub fn from_dataset(dataset: Dataset) -> DashboardResult<SeriesStore> {
        if dataset.months.is_empty() {
            return Err(DashboardError::EmptyDataset("no months in data file".into()));
        }
        if dataset.series.is_empty() {
            return Err(DashboardError::EmptyDataset("no series in data file".into()));
        }
        validate_periods(&dataset.months)?;

        for (key, s) in &dataset.series {
            let expected = s.key();
            if *key != expected {
                return Err(DashboardError::InvalidDataset {
                    field: format!("series.{}", key),
                    reason: format!("key does not match component/uom (expected '{}')", expected),
                });
            }
            if s.data.len() != dataset.months.len() {
                return Err(DashboardError::InvalidDataset {
                    field: format!("series.{}.data", key),
                    reason: format!(
                        "has {} values but there are {} months",
                        s.data.len(),
                        dataset.months.len()
                    ),
                });
            }
        }

        debug!(
            periods = dataset.months.len(),
            series = dataset.series.len(),
            "series store loaded"
        );

        Ok(SeriesStore {
            periods: dataset.months,
            series: dataset.series,
        })
    }

    /// Parse the JSON data file contents.
    pub fn from_json_str(json: &str) -> DashboardResult<SeriesStore> {
        let dataset: Dataset =
            serde_json::from_str(json).map_err(|e| DashboardError::Parse(e.to_string()))?;
        SeriesStore::from_dataset(dataset)
    }

    /// Read and parse the JSON data file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> DashboardResult<SeriesStore> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| DashboardError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        SeriesStore::from_json_str(&contents).map_err(|e| match e {
            DashboardError::Parse(reason) => DashboardError::Load {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, label: &str, unit: Unit) -> Option<&Series> {
        self.series.get(&series_key(label, unit))
    }

    /// The amount series that weights a rate series with the same label.
    pub fn sibling_weight(&self, label: &str) -> Option<&Series> {
        self.get(label, Unit::Amount)
    }

    /// All series in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.values()
    }

    /// Distinct component labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.series.values().map(|s| s.component.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}
