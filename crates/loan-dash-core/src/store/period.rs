use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DashboardError;
use crate::DashboardResult;

/// First month shown when the caller does not pick a start.
pub const DEFAULT_START: &str = "2018-01";

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// A calendar month token in `YYYY-MM` form.
///
/// Ordering is lexical on the token, which for this fixed-width format is the
/// same as chronological ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(String);

impl Period {
    /// Parse and validate a `YYYY-MM` token.
    pub fn parse(token: &str) -> DashboardResult<Period> {
        let token = token.trim();
        let well_formed = token.len() == 7
            && token.as_bytes()[4] == b'-'
            && NaiveDate::parse_from_str(&format!("{}-01", token), "%Y-%m-%d").is_ok();
        if !well_formed {
            return Err(DashboardError::InvalidInput {
                field: "period".into(),
                reason: format!("'{}' is not a YYYY-MM month", token),
            });
        }
        Ok(Period(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Period {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Period::parse(&value)
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// PeriodRange
// ---------------------------------------------------------------------------

/// Inclusive index window into the shared period list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub start: usize,
    pub end: usize,
}

impl PeriodRange {
    pub fn new(start: usize, end: usize) -> DashboardResult<PeriodRange> {
        if end < start {
            return Err(DashboardError::InvalidInput {
                field: "range".into(),
                reason: format!("end index {} is before start index {}", end, start),
            });
        }
        Ok(PeriodRange { start, end })
    }

    /// Whole list.
    pub fn full(len: usize) -> DashboardResult<PeriodRange> {
        if len == 0 {
            return Err(DashboardError::EmptyDataset("no periods loaded".into()));
        }
        Ok(PeriodRange { start: 0, end: len - 1 })
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Check the strictly-increasing invariant of a period list.
pub fn validate_periods(periods: &[Period]) -> DashboardResult<()> {
    for pair in periods.windows(2) {
        if pair[0] >= pair[1] {
            return Err(DashboardError::InvalidDataset {
                field: "months".into(),
                reason: format!(
                    "periods must be strictly increasing ('{}' then '{}')",
                    pair[0], pair[1]
                ),
            });
        }
    }
    Ok(())
}

/// Map start/end month tokens onto an index window.
///
/// The start is the first period at or after `start`; when none exists the
/// window starts at the first period. The end is the first period at or after
/// `end`; when none exists, or it falls before the start, the window runs to
/// the last period. Tokens are compared as strings and need not be loaded
/// periods themselves.
pub fn resolve_range(periods: &[Period], start: &str, end: &str) -> DashboardResult<PeriodRange> {
    let last = PeriodRange::full(periods.len())?.end;

    let start_idx = periods
        .iter()
        .position(|p| p.as_str() >= start)
        .unwrap_or(0);

    let end_idx = match periods.iter().position(|p| p.as_str() >= end) {
        Some(i) if i >= start_idx => i,
        _ => last,
    };

    PeriodRange::new(start_idx, end_idx)
}
