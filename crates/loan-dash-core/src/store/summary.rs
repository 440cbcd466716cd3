use serde::{Deserialize, Serialize};

use crate::filter::{LoanType, Metric};
use crate::store::{Period, SeriesStore};
use crate::types::Unit;

/// Label counts for one loan type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTypeCoverage {
    pub loan_type: LoanType,
    pub outstanding_balance_labels: usize,
    pub funds_advanced_labels: usize,
}

/// What a loaded data file contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub first_month: Period,
    pub last_month: Period,
    pub months: usize,
    pub amount_series: usize,
    pub rate_series: usize,
    /// Series with no observation at all
    pub empty_series: usize,
    pub coverage: Vec<LoanTypeCoverage>,
}

fn count_labels(labels: &[String], loan_type: LoanType, metric: Metric) -> usize {
    labels
        .iter()
        .filter(|l| l.contains(loan_type.phrase()) && l.contains(metric.phrase()))
        .count()
}

impl SeriesStore {
    pub fn summary(&self) -> StoreSummary {
        let periods = self.periods();
        let lower: Vec<String> = self.labels().iter().map(|l| l.to_lowercase()).collect();

        let coverage = LoanType::ALL
            .into_iter()
            .map(|t| LoanTypeCoverage {
                loan_type: t,
                outstanding_balance_labels: count_labels(&lower, t, Metric::OutstandingBalances),
                funds_advanced_labels: count_labels(&lower, t, Metric::FundsAdvanced),
            })
            .collect();

        StoreSummary {
            first_month: periods[0].clone(),
            last_month: periods[periods.len() - 1].clone(),
            months: periods.len(),
            amount_series: self.iter().filter(|s| s.uom == Unit::Amount).count(),
            rate_series: self.iter().filter(|s| s.uom == Unit::Rate).count(),
            empty_series: self.iter().filter(|s| s.observation_count() == 0).count(),
            coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let store = SeriesStore::from_json_str(
            r#"{"months": ["2021-01", "2021-02", "2021-03"], "series": {
                "Funds advanced, auto loans___Dollars": {"component": "Funds advanced, auto loans", "uom": "Dollars", "data": [1, 2, null]},
                "Funds advanced, auto loans___Percent": {"component": "Funds advanced, auto loans", "uom": "Percent", "data": [null, null, null]},
                "Outstanding balances, business loans, lease receivables___Dollars": {"component": "Outstanding balances, business loans, lease receivables", "uom": "Dollars", "data": [5, 5, 5]}
            }}"#,
        )
        .unwrap();
        let s = store.summary();
        assert_eq!(s.first_month.as_str(), "2021-01");
        assert_eq!(s.last_month.as_str(), "2021-03");
        assert_eq!(s.months, 3);
        assert_eq!(s.amount_series, 2);
        assert_eq!(s.rate_series, 1);
        assert_eq!(s.empty_series, 1);

        let auto = s.coverage.iter().find(|c| c.loan_type == LoanType::AutoLoans).unwrap();
        assert_eq!(auto.funds_advanced_labels, 1);
        assert_eq!(auto.outstanding_balance_labels, 0);
        let business = s.coverage.iter().find(|c| c.loan_type == LoanType::Business).unwrap();
        assert_eq!(business.outstanding_balance_labels, 1);
    }
}
