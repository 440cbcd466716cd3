use clap::Args;
use serde_json::Value;

use loan_dash_core::aggregate::{self, ViewRequest};
use loan_dash_core::filter::{
    BusinessSubtype, CombineFlags, FilterSelection, Insurance, LoanType, LocSecurity, Metric,
    RateTerm,
};
use loan_dash_core::store::SeriesStore;

use crate::input;

/// Arguments for one aggregation pass over the data file
#[derive(Args)]
pub struct ViewArgs {
    /// Path to the JSON data file
    #[arg(long, default_value = "data.json")]
    pub data: String,

    /// Path to a JSON view request (selection plus start/end)
    #[arg(long)]
    pub request: Option<String>,

    /// Loan type: residential, auto_loans, credit_cards, loc, personal_other, business
    #[arg(long)]
    pub loan_type: Option<LoanType>,

    /// Metric: outstanding_balances or funds_advanced
    #[arg(long, default_value = "outstanding_balances")]
    pub metric: Metric,

    /// Comma-separated insurance statuses (insured, uninsured)
    #[arg(long, value_delimiter = ',')]
    pub insurance: Vec<Insurance>,

    /// Comma-separated rate terms (variable, fixed_1, fixed_1to3, fixed_3to5, fixed_5plus)
    #[arg(long, value_delimiter = ',')]
    pub rate_term: Vec<RateTerm>,

    /// Comma-separated line-of-credit security types (secured, unsecured)
    #[arg(long, value_delimiter = ',')]
    pub loc: Vec<LocSecurity>,

    /// Comma-separated business subtypes (regulated, lease, loans_indiv, non_residential)
    #[arg(long, value_delimiter = ',')]
    pub business: Vec<BusinessSubtype>,

    /// Select every sub-facet value, then apply any explicit lists on top
    #[arg(long)]
    pub all_facets: bool,

    /// Merge insured and uninsured mortgages
    #[arg(long)]
    pub combine_insurance: bool,

    /// Merge mortgage rate terms
    #[arg(long)]
    pub combine_rate: bool,

    /// Merge secured and unsecured lines of credit
    #[arg(long)]
    pub combine_loc: bool,

    /// Merge business loan subtypes
    #[arg(long)]
    pub combine_business: bool,

    /// First month (YYYY-MM)
    #[arg(long)]
    pub start: Option<String>,

    /// Last month (YYYY-MM)
    #[arg(long)]
    pub end: Option<String>,
}

fn request_from_flags(args: &ViewArgs, loan_type: LoanType) -> ViewRequest {
    let mut selection = FilterSelection::new(loan_type, args.metric);
    if args.all_facets {
        selection = selection.select_all();
    }
    if !args.insurance.is_empty() {
        selection = selection.with_insurance(args.insurance.iter().copied());
    }
    if !args.rate_term.is_empty() {
        selection = selection.with_rate_terms(args.rate_term.iter().copied());
    }
    if !args.loc.is_empty() {
        selection = selection.with_loc(args.loc.iter().copied());
    }
    if !args.business.is_empty() {
        selection = selection.with_business(args.business.iter().copied());
    }
    selection = selection.with_combine(CombineFlags {
        insurance: args.combine_insurance,
        rate_term: args.combine_rate,
        loc: args.combine_loc,
        business: args.combine_business,
    });

    ViewRequest {
        selection,
        start: args.start.clone(),
        end: args.end.clone(),
    }
}

pub fn run_view(args: ViewArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = if let Some(ref path) = args.request {
        input::file::read_request(path)?
    } else if let Some(loan_type) = args.loan_type {
        request_from_flags(&args, loan_type)
    } else if let Some(request) = input::stdin::read_request()? {
        request
    } else {
        return Err("--request <file.json>, stdin, or --loan-type required for view".into());
    };

    let store = SeriesStore::load(&args.data)?;
    let result = aggregate::compute_view(&store, &request)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        view: ViewArgs,
    }

    #[test]
    fn test_flags_build_selection() {
        let cli = TestCli::parse_from([
            "loandash",
            "--loan-type",
            "residential",
            "--insurance",
            "insured,uninsured",
            "--rate-term",
            "variable",
            "--combine-insurance",
            "--start",
            "2020-01",
        ]);
        let loan_type = cli.view.loan_type.unwrap();
        let req = request_from_flags(&cli.view, loan_type);
        assert_eq!(req.selection.loan_type, LoanType::Residential);
        assert_eq!(req.selection.metric, Metric::OutstandingBalances);
        assert_eq!(req.selection.insurance.len(), 2);
        assert_eq!(req.selection.rate_terms.len(), 1);
        assert!(req.selection.combine.insurance);
        assert!(!req.selection.combine.rate_term);
        assert_eq!(req.start.as_deref(), Some("2020-01"));
    }

    #[test]
    fn test_all_facets_then_override() {
        let cli = TestCli::parse_from([
            "loandash",
            "--loan-type",
            "loc",
            "--metric",
            "funds_advanced",
            "--all-facets",
            "--loc",
            "unsecured",
        ]);
        let req = request_from_flags(&cli.view, LoanType::LinesOfCredit);
        assert_eq!(req.selection.loc.len(), 1);
        assert_eq!(req.selection.rate_terms.len(), 5);
        assert_eq!(req.selection.metric, Metric::FundsAdvanced);
    }
}
