use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::DashboardError;
use crate::filter::{group_key_for, matches, FilterSelection};
use crate::store::{Period, PeriodRange, Series, SeriesStore};
use crate::types::{Money, Percent, Unit};
use crate::DashboardResult;

/// Raw amounts are published in millions; the dashboard shows billions.
const AMOUNT_SCALE: Decimal = dec!(1000);

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One display group, aligned to the requested period window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSeries {
    pub label: String,
    /// Summed amounts in billions; null where no contributing series had data
    pub amount_series: Vec<Option<Money>>,
    /// Funds-weighted average rate; null where no rate was observed
    pub rate_series: Vec<Option<Percent>>,
    pub has_amount: bool,
    pub has_rate: bool,
}

/// Most recent observed rate for a group, for summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestRate {
    pub label: String,
    pub period: Period,
    pub value: Percent,
}

/// Everything the presentation layer needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub periods: Vec<Period>,
    /// Groups in the order their first series was seen
    pub groups: Vec<GroupSeries>,
    /// Smallest amount across all groups and periods
    pub min_amount: Option<Money>,
    /// Smallest compiled rate across all groups and periods
    pub min_rate: Option<Percent>,
    pub latest_rates: Vec<LatestRate>,
    /// Number of series that passed the facet filter
    pub matched_series: usize,
    /// Labels of rate series that had no amount series to weight them
    pub unweighted_rate_series: Vec<String>,
    /// Rate observations averaged with weight 1 because the weight was missing
    pub unweighted_observations: usize,
}

impl DashboardView {
    pub fn group(&self, label: &str) -> Option<&GroupSeries> {
        self.groups.iter().find(|g| g.label == label)
    }
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Running totals for one group over the window. Slots stay `None` until the
/// first contribution so gaps survive as nulls.
#[derive(Debug, Clone)]
struct GroupAccumulator {
    amount: Vec<Option<Decimal>>,
    rate_num: Vec<Option<Decimal>>,
    rate_den: Vec<Option<Decimal>>,
    has_amount: bool,
    has_rate: bool,
}

impl GroupAccumulator {
    fn new(len: usize) -> Self {
        GroupAccumulator {
            amount: vec![None; len],
            rate_num: vec![None; len],
            rate_den: vec![None; len],
            has_amount: false,
            has_rate: false,
        }
    }

    fn add_amounts(&mut self, series: &Series, range: PeriodRange) {
        for (slot, idx) in range.indices().enumerate() {
            if let Some(v) = series.value_at(idx) {
                let acc = self.amount[slot].get_or_insert(Decimal::ZERO);
                *acc += v / AMOUNT_SCALE;
                self.has_amount = true;
            }
        }
    }

    /// Fold a rate series in, weighted by `weight` where it has data.
    /// Returns how many observations fell back to weight 1.
    fn add_rates(&mut self, series: &Series, weight: Option<&Series>, range: PeriodRange) -> usize {
        let mut unweighted = 0;
        for (slot, idx) in range.indices().enumerate() {
            let Some(rate) = series.value_at(idx) else {
                continue;
            };
            let num = self.rate_num[slot].get_or_insert(Decimal::ZERO);
            let den = self.rate_den[slot].get_or_insert(Decimal::ZERO);
            match weight.and_then(|w| w.value_at(idx)) {
                Some(w) => {
                    *num += rate * w;
                    *den += w;
                }
                None => {
                    *num += rate;
                    *den += Decimal::ONE;
                    unweighted += 1;
                }
            }
            self.has_rate = true;
        }
        unweighted
    }

    fn compiled_rates(&self) -> Vec<Option<Percent>> {
        self.rate_num
            .iter()
            .zip(&self.rate_den)
            .map(|(num, den)| match (num, den) {
                (Some(n), Some(d)) if !d.is_zero() => Some(n / d),
                _ => None,
            })
            .collect()
    }

    fn finish(self, label: String) -> GroupSeries {
        let rate_series = self.compiled_rates();
        GroupSeries {
            label,
            amount_series: self.amount,
            rate_series,
            has_amount: self.has_amount,
            has_rate: self.has_rate,
        }
    }
}

// ---------------------------------------------------------------------------
// aggregate
// ---------------------------------------------------------------------------

fn min_observed<'a>(values: impl Iterator<Item = &'a Option<Decimal>>) -> Option<Decimal> {
    values.flatten().copied().min()
}

/// Run one aggregation pass: filter, bucket by group key, reduce.
///
/// Amounts are summed (converted to billions). Rates are averaged weighted by
/// the amount series with the same raw label; where that weight is missing
/// the rate counts with weight 1.
pub fn aggregate(
    store: &SeriesStore,
    selection: &FilterSelection,
    range: PeriodRange,
) -> DashboardResult<DashboardView> {
    let periods = store.periods();
    if range.end < range.start || range.end >= periods.len() {
        return Err(DashboardError::InvalidInput {
            field: "range".into(),
            reason: format!(
                "[{}, {}] is outside the {} loaded periods",
                range.start,
                range.end,
                periods.len()
            ),
        });
    }
    let len = range.len();

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, GroupAccumulator> = HashMap::new();
    let mut matched_series = 0;
    let mut unweighted_rate_series = Vec::new();
    let mut unweighted_observations = 0;

    for series in store.iter() {
        if !matches(&series.component, selection) {
            continue;
        }
        matched_series += 1;

        let key = group_key_for(&series.component, selection);
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            GroupAccumulator::new(len)
        });

        match series.uom {
            Unit::Amount => group.add_amounts(series, range),
            Unit::Rate => {
                let weight = store.sibling_weight(&series.component);
                let unweighted = group.add_rates(series, weight, range);
                if weight.is_none() && unweighted > 0 {
                    unweighted_rate_series.push(series.component.clone());
                }
                unweighted_observations += unweighted;
            }
        }
    }

    let mut out_groups = Vec::with_capacity(order.len());
    for label in order {
        if let Some(acc) = groups.remove(&label) {
            out_groups.push(acc.finish(label));
        }
    }

    let min_amount = min_observed(
        out_groups
            .iter()
            .filter(|g| g.has_amount)
            .flat_map(|g| g.amount_series.iter()),
    );
    let min_rate = min_observed(
        out_groups
            .iter()
            .filter(|g| g.has_rate)
            .flat_map(|g| g.rate_series.iter()),
    );

    let window = &periods[range.start..=range.end];
    let latest_rates = out_groups
        .iter()
        .filter(|g| g.has_rate)
        .filter_map(|g| {
            g.rate_series
                .iter()
                .enumerate()
                .rev()
                .find_map(|(i, v)| v.map(|value| (i, value)))
                .map(|(i, value)| LatestRate {
                    label: g.label.clone(),
                    period: window[i].clone(),
                    value,
                })
        })
        .collect();

    debug!(
        loan_type = %selection.loan_type,
        matched_series,
        groups = out_groups.len(),
        periods = len,
        "aggregation pass complete"
    );

    Ok(DashboardView {
        periods: window.to_vec(),
        groups: out_groups,
        min_amount,
        min_rate,
        latest_rates,
        matched_series,
        unweighted_rate_series,
        unweighted_observations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{CombineFlags, LoanType, Metric, COMBINED_SELECTED};
    use crate::store::Dataset;
    use rust_decimal_macros::dec;

    fn series(label: &str, unit: Unit, data: Vec<Option<Decimal>>) -> Series {
        Series {
            component: label.to_string(),
            uom: unit,
            data,
        }
    }

    fn store(months: &[&str], all: Vec<Series>) -> SeriesStore {
        let dataset = Dataset {
            months: months.iter().map(|m| Period::parse(m).unwrap()).collect(),
            series: all.into_iter().map(|s| (s.key(), s)).collect(),
        };
        SeriesStore::from_dataset(dataset).unwrap()
    }

    fn auto() -> FilterSelection {
        FilterSelection::new(LoanType::AutoLoans, Metric::OutstandingBalances)
    }

    #[test]
    fn test_amount_converted_to_billions() {
        let s = store(
            &["2020-01"],
            vec![series("Outstanding balances, auto loans", Unit::Amount, vec![Some(dec!(12345))])],
        );
        let view = aggregate(&s, &auto(), PeriodRange::full(1).unwrap()).unwrap();
        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].amount_series, vec![Some(dec!(12.345))]);
        assert!(view.groups[0].has_amount);
        assert!(!view.groups[0].has_rate);
        assert_eq!(view.min_amount, Some(dec!(12.345)));
        assert_eq!(view.min_rate, None);
    }

    #[test]
    fn test_rate_weighted_by_sibling_amount() {
        let sel = FilterSelection::new(LoanType::LinesOfCredit, Metric::OutstandingBalances)
            .select_all()
            .with_combine(CombineFlags::all());
        let a = "Outstanding balances, lines of credit, secured";
        let b = "Outstanding balances, lines of credit, unsecured";
        let s = store(
            &["2020-01"],
            vec![
                series(a, Unit::Amount, vec![Some(dec!(100))]),
                series(a, Unit::Rate, vec![Some(dec!(2.0))]),
                series(b, Unit::Amount, vec![Some(dec!(300))]),
                series(b, Unit::Rate, vec![Some(dec!(4.0))]),
            ],
        );
        let view = aggregate(&s, &sel, PeriodRange::full(1).unwrap()).unwrap();
        let g = view.group(COMBINED_SELECTED).unwrap();
        assert_eq!(g.rate_series, vec![Some(dec!(3.5))]);
        assert_eq!(g.amount_series, vec![Some(dec!(0.4))]);
        assert_eq!(view.unweighted_observations, 0);
    }

    #[test]
    fn test_rate_without_weight_falls_back_to_unweighted() {
        let s = store(
            &["2020-01"],
            vec![series("Outstanding balances, auto loans", Unit::Rate, vec![Some(dec!(5.0))])],
        );
        let view = aggregate(&s, &auto(), PeriodRange::full(1).unwrap()).unwrap();
        assert_eq!(view.groups[0].rate_series, vec![Some(dec!(5.0))]);
        assert_eq!(view.unweighted_rate_series, vec!["Outstanding balances, auto loans".to_string()]);
        assert_eq!(view.unweighted_observations, 1);
    }

    #[test]
    fn test_null_weight_falls_back_per_period() {
        let label = "Outstanding balances, auto loans";
        let s = store(
            &["2020-01", "2020-02"],
            vec![
                series(label, Unit::Amount, vec![Some(dec!(200)), None]),
                series(label, Unit::Rate, vec![Some(dec!(3)), Some(dec!(6))]),
            ],
        );
        let view = aggregate(&s, &auto(), PeriodRange::full(2).unwrap()).unwrap();
        let g = &view.groups[0];
        assert_eq!(g.rate_series, vec![Some(dec!(3)), Some(dec!(6))]);
        assert_eq!(g.amount_series, vec![Some(dec!(0.2)), None]);
        assert!(view.unweighted_rate_series.is_empty());
        assert_eq!(view.unweighted_observations, 1);
    }

    #[test]
    fn test_zero_weight_yields_null_rate() {
        let label = "Outstanding balances, auto loans";
        let s = store(
            &["2020-01"],
            vec![
                series(label, Unit::Amount, vec![Some(dec!(0))]),
                series(label, Unit::Rate, vec![Some(dec!(4))]),
            ],
        );
        let view = aggregate(&s, &auto(), PeriodRange::full(1).unwrap()).unwrap();
        assert_eq!(view.groups[0].rate_series, vec![None]);
        assert!(view.groups[0].has_rate);
        assert!(view.latest_rates.is_empty());
        assert_eq!(view.min_rate, None);
    }

    #[test]
    fn test_range_window_slices_series() {
        let label = "Outstanding balances, auto loans";
        let s = store(
            &["2020-01", "2020-02", "2020-03"],
            vec![series(label, Unit::Amount, vec![Some(dec!(1000)), Some(dec!(2000)), Some(dec!(3000))])],
        );
        let view = aggregate(&s, &auto(), PeriodRange::new(1, 2).unwrap()).unwrap();
        assert_eq!(view.periods.len(), 2);
        assert_eq!(view.periods[0].as_str(), "2020-02");
        assert_eq!(view.groups[0].amount_series, vec![Some(dec!(2)), Some(dec!(3))]);
        assert_eq!(view.min_amount, Some(dec!(2)));
    }

    #[test]
    fn test_range_outside_store_rejected() {
        let s = store(
            &["2020-01"],
            vec![series("Outstanding balances, auto loans", Unit::Amount, vec![Some(dec!(1))])],
        );
        assert!(aggregate(&s, &auto(), PeriodRange { start: 0, end: 3 }).is_err());
    }

    #[test]
    fn test_latest_rate_scans_backwards() {
        let label = "Outstanding balances, auto loans";
        let s = store(
            &["2020-01", "2020-02", "2020-03"],
            vec![series(label, Unit::Rate, vec![Some(dec!(4.1)), Some(dec!(4.2)), None])],
        );
        let view = aggregate(&s, &auto(), PeriodRange::full(3).unwrap()).unwrap();
        assert_eq!(view.latest_rates.len(), 1);
        assert_eq!(view.latest_rates[0].value, dec!(4.2));
        assert_eq!(view.latest_rates[0].period.as_str(), "2020-02");
        assert_eq!(view.min_rate, Some(dec!(4.1)));
    }

    #[test]
    fn test_latest_rate_keeps_zero() {
        let label = "Outstanding balances, auto loans";
        let s = store(
            &["2020-01", "2020-02"],
            vec![series(label, Unit::Rate, vec![Some(dec!(1.5)), Some(dec!(0))])],
        );
        let view = aggregate(&s, &auto(), PeriodRange::full(2).unwrap()).unwrap();
        assert_eq!(view.latest_rates.len(), 1);
        assert_eq!(view.latest_rates[0].value, dec!(0));
        assert_eq!(view.latest_rates[0].period.as_str(), "2020-02");
        assert_eq!(view.min_rate, Some(dec!(0)));
    }

    #[test]
    fn test_unweighted_label_needs_observation_in_window() {
        let label = "Outstanding balances, auto loans";
        let s = store(
            &["2020-01", "2020-02"],
            vec![series(label, Unit::Rate, vec![Some(dec!(5)), None])],
        );
        let view = aggregate(&s, &auto(), PeriodRange::new(1, 1).unwrap()).unwrap();
        assert!(view.unweighted_rate_series.is_empty());
        assert_eq!(view.unweighted_observations, 0);
        assert!(!view.groups[0].has_rate);

        let view = aggregate(&s, &auto(), PeriodRange::full(2).unwrap()).unwrap();
        assert_eq!(view.unweighted_rate_series, vec![label.to_string()]);
    }

    #[test]
    fn test_no_matches_yields_no_groups() {
        let s = store(
            &["2020-01"],
            vec![series("Outstanding balances, auto loans", Unit::Amount, vec![Some(dec!(1))])],
        );
        let sel = FilterSelection::new(LoanType::Business, Metric::OutstandingBalances);
        let view = aggregate(&s, &sel, PeriodRange::full(1).unwrap()).unwrap();
        assert!(view.groups.is_empty());
        assert_eq!(view.matched_series, 0);
        assert_eq!(view.min_amount, None);
    }
}
