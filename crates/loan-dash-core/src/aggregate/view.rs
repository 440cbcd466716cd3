use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::aggregate::engine::{aggregate, DashboardView};
use crate::filter::FilterSelection;
use crate::store::{resolve_range, SeriesStore, DEFAULT_START};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DashboardResult;

/// A selection plus the month window to show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRequest {
    #[serde(flatten)]
    pub selection: FilterSelection,
    /// First month (`YYYY-MM`); defaults to 2018-01
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Last month (`YYYY-MM`); defaults to the latest loaded month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl ViewRequest {
    pub fn new(selection: FilterSelection) -> Self {
        ViewRequest {
            selection,
            start: None,
            end: None,
        }
    }
}

/// Display floor for the amount axis: 10% under the smallest amount, never
/// below zero.
pub fn axis_floor(min_amount: Option<Money>) -> Money {
    match min_amount {
        Some(m) => (m * dec!(0.9)).max(Decimal::ZERO),
        None => Decimal::ZERO,
    }
}

/// Resolve the request's window against the store and run one aggregation
/// pass.
pub fn compute_view(
    store: &SeriesStore,
    request: &ViewRequest,
) -> DashboardResult<ComputationOutput<DashboardView>> {
    let started = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let periods = store.periods();
    let start = request.start.as_deref().unwrap_or(DEFAULT_START);
    let end = match request.end.as_deref() {
        Some(e) => e.to_string(),
        None => periods
            .last()
            .map(|p| p.to_string())
            .unwrap_or_default(),
    };
    let range = resolve_range(periods, start, &end)?;

    for dim in request.selection.empty_dimensions() {
        warnings.push(format!(
            "No {:?} values selected for {}: nothing can match",
            dim, request.selection.loan_type
        ));
    }

    let view = aggregate(store, &request.selection, range)?;

    if view.matched_series == 0 {
        warnings.push("No series match the current selection".to_string());
    }
    for label in &view.unweighted_rate_series {
        warnings.push(format!(
            "No balance series for '{}'; its rates are averaged unweighted",
            label
        ));
    }

    let assumptions = serde_json::json!({
        "amount_unit": "billions (raw / 1000)",
        "rate_weighting": "funds-weighted by the amount series with the same label; weight 1 when absent",
        "start": view.periods.first(),
        "end": view.periods.last(),
        "amount_axis_floor": axis_floor(view.min_amount),
    });

    Ok(with_metadata(
        "Facet filter, group-key bucketing, sum / funds-weighted average",
        &assumptions,
        warnings,
        started.elapsed().as_micros() as u64,
        view,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{LoanType, Metric, RateTerm};

    const DATA: &str = r#"{
        "months": ["2017-12", "2018-01", "2018-02"],
        "series": {
            "Outstanding balances, auto loans___Dollars": {
                "component": "Outstanding balances, auto loans",
                "uom": "Dollars",
                "data": [900, 1000, 1100]
            },
            "Outstanding balances, auto loans___Percent": {
                "component": "Outstanding balances, auto loans",
                "uom": "Percent",
                "data": [6.0, 6.1, null]
            }
        }
    }"#;

    #[test]
    fn test_axis_floor() {
        assert_eq!(axis_floor(Some(dec!(10))), dec!(9));
        assert_eq!(axis_floor(Some(dec!(-5))), Decimal::ZERO);
        assert_eq!(axis_floor(None), Decimal::ZERO);
    }

    #[test]
    fn test_default_window_starts_2018() {
        let store = SeriesStore::from_json_str(DATA).unwrap();
        let req = ViewRequest::new(FilterSelection::new(LoanType::AutoLoans, Metric::OutstandingBalances));
        let out = compute_view(&store, &req).unwrap();
        let view = &out.result;
        assert_eq!(view.periods.len(), 2);
        assert_eq!(view.groups[0].amount_series, vec![Some(dec!(1)), Some(dec!(1.1))]);
        assert_eq!(view.latest_rates[0].value, dec!(6.1));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_explicit_window() {
        let store = SeriesStore::from_json_str(DATA).unwrap();
        let mut req =
            ViewRequest::new(FilterSelection::new(LoanType::AutoLoans, Metric::OutstandingBalances));
        req.start = Some("2017-01".into());
        req.end = Some("2017-12".into());
        let out = compute_view(&store, &req).unwrap();
        assert_eq!(out.result.periods.len(), 1);
        assert_eq!(out.result.groups[0].amount_series, vec![Some(dec!(0.9))]);
    }

    #[test]
    fn test_empty_selection_warns() {
        let store = SeriesStore::from_json_str(DATA).unwrap();
        let sel = FilterSelection::new(LoanType::Residential, Metric::OutstandingBalances)
            .with_rate_terms([RateTerm::Variable]);
        let out = compute_view(&store, &ViewRequest::new(sel)).unwrap();
        assert!(out.result.groups.is_empty());
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_request_deserializes_flat() {
        let req: ViewRequest = serde_json::from_str(
            r#"{"loan_type": "residential", "metric": "outstanding_balances",
                "insurance": ["insured"], "rate_terms": ["variable", "fixed_5plus"],
                "combine": {"rate_term": true}, "start": "2019-01"}"#,
        )
        .unwrap();
        assert_eq!(req.selection.loan_type, LoanType::Residential);
        assert_eq!(req.selection.rate_terms.len(), 2);
        assert!(req.selection.combine.rate_term);
        assert_eq!(req.start.as_deref(), Some("2019-01"));
        assert_eq!(req.end, None);
    }
}
