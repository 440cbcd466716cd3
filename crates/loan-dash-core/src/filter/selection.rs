use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Top-level discriminants
// ---------------------------------------------------------------------------

/// Loan category shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Residential,
    AutoLoans,
    CreditCards,
    #[serde(rename = "loc")]
    LinesOfCredit,
    PersonalOther,
    Business,
}

impl LoanType {
    pub const ALL: [LoanType; 6] = [
        LoanType::Residential,
        LoanType::AutoLoans,
        LoanType::CreditCards,
        LoanType::LinesOfCredit,
        LoanType::PersonalOther,
        LoanType::Business,
    ];

    /// Lower-case phrase a category label must contain to belong to this type.
    pub fn phrase(&self) -> &'static str {
        match self {
            LoanType::Residential => "residential mortgages",
            LoanType::AutoLoans => "auto loans",
            LoanType::CreditCards => "credit card",
            LoanType::LinesOfCredit => "lines of credit",
            LoanType::PersonalOther => "other personal",
            LoanType::Business => "business loans",
        }
    }

    /// Sub-facet dimensions that apply to this loan type.
    pub fn facet_dimensions(&self) -> &'static [FacetDimension] {
        match self {
            LoanType::Residential => &[FacetDimension::Insurance, FacetDimension::RateTerm],
            LoanType::LinesOfCredit => &[FacetDimension::LocSecurity],
            LoanType::Business => &[FacetDimension::BusinessSubtype],
            _ => &[],
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            LoanType::Residential => "residential",
            LoanType::AutoLoans => "auto_loans",
            LoanType::CreditCards => "credit_cards",
            LoanType::LinesOfCredit => "loc",
            LoanType::PersonalOther => "personal_other",
            LoanType::Business => "business",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LoanType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoanType::ALL
            .into_iter()
            .find(|t| t.id() == s.trim())
            .ok_or_else(|| DashboardError::InvalidInput {
                field: "loan_type".into(),
                reason: format!("unknown loan type '{}'", s),
            })
    }
}

/// Which flow the dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    OutstandingBalances,
    FundsAdvanced,
}

impl Metric {
    pub fn phrase(&self) -> &'static str {
        match self {
            Metric::OutstandingBalances => "outstanding balances",
            Metric::FundsAdvanced => "funds advanced",
        }
    }
}

impl FromStr for Metric {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "outstanding_balances" | "balances" => Ok(Metric::OutstandingBalances),
            "funds_advanced" | "advanced" => Ok(Metric::FundsAdvanced),
            _ => Err(DashboardError::InvalidInput {
                field: "metric".into(),
                reason: format!("unknown metric '{}'", s),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-facets
// ---------------------------------------------------------------------------

/// A filterable dimension below the loan type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetDimension {
    Insurance,
    RateTerm,
    LocSecurity,
    BusinessSubtype,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insurance {
    Insured,
    Uninsured,
}

impl Insurance {
    pub const ALL: [Insurance; 2] = [Insurance::Insured, Insurance::Uninsured];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RateTerm {
    #[serde(rename = "variable")]
    Variable,
    #[serde(rename = "fixed_1")]
    FixedUnder1,
    #[serde(rename = "fixed_1to3")]
    Fixed1To3,
    #[serde(rename = "fixed_3to5")]
    Fixed3To5,
    #[serde(rename = "fixed_5plus")]
    Fixed5Plus,
}

impl RateTerm {
    pub const ALL: [RateTerm; 5] = [
        RateTerm::Variable,
        RateTerm::FixedUnder1,
        RateTerm::Fixed1To3,
        RateTerm::Fixed3To5,
        RateTerm::Fixed5Plus,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocSecurity {
    Secured,
    Unsecured,
}

impl LocSecurity {
    pub const ALL: [LocSecurity; 2] = [LocSecurity::Secured, LocSecurity::Unsecured];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BusinessSubtype {
    #[serde(rename = "regulated")]
    Regulated,
    #[serde(rename = "lease")]
    LeaseReceivables,
    #[serde(rename = "loans_indiv")]
    LoansToIndividuals,
    #[serde(rename = "non_residential")]
    NonResidential,
}

impl BusinessSubtype {
    pub const ALL: [BusinessSubtype; 4] = [
        BusinessSubtype::Regulated,
        BusinessSubtype::LeaseReceivables,
        BusinessSubtype::LoansToIndividuals,
        BusinessSubtype::NonResidential,
    ];
}

macro_rules! impl_facet_from_str {
    ($ty:ty, $field:literal) => {
        impl FromStr for $ty {
            type Err = DashboardError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                serde_json::from_value(serde_json::Value::String(s.trim().to_string())).map_err(
                    |_| DashboardError::InvalidInput {
                        field: $field.into(),
                        reason: format!("unknown value '{}'", s),
                    },
                )
            }
        }
    };
}

impl_facet_from_str!(Insurance, "insurance");
impl_facet_from_str!(RateTerm, "rate_term");
impl_facet_from_str!(LocSecurity, "loc");
impl_facet_from_str!(BusinessSubtype, "business");

/// "Combine" checkboxes: each one folds its dimension out of the group key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineFlags {
    pub insurance: bool,
    pub rate_term: bool,
    pub loc: bool,
    pub business: bool,
}

impl CombineFlags {
    pub fn all() -> CombineFlags {
        CombineFlags {
            insurance: true,
            rate_term: true,
            loc: true,
            business: true,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSelection
// ---------------------------------------------------------------------------

/// Snapshot of what the user picked. Sub-facet sets are only consulted when
/// the loan type owns that dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub loan_type: LoanType,
    pub metric: Metric,
    #[serde(default)]
    pub insurance: BTreeSet<Insurance>,
    #[serde(default)]
    pub rate_terms: BTreeSet<RateTerm>,
    #[serde(default)]
    pub loc: BTreeSet<LocSecurity>,
    #[serde(default)]
    pub business: BTreeSet<BusinessSubtype>,
    #[serde(default)]
    pub combine: CombineFlags,
}

impl FilterSelection {
    /// Selection with every sub-facet cleared and no combine flags.
    pub fn new(loan_type: LoanType, metric: Metric) -> FilterSelection {
        FilterSelection {
            loan_type,
            metric,
            insurance: BTreeSet::new(),
            rate_terms: BTreeSet::new(),
            loc: BTreeSet::new(),
            business: BTreeSet::new(),
            combine: CombineFlags::default(),
        }
    }

    /// Every sub-facet value selected ("Select All" on each slicer).
    pub fn select_all(mut self) -> FilterSelection {
        self.insurance = Insurance::ALL.into_iter().collect();
        self.rate_terms = RateTerm::ALL.into_iter().collect();
        self.loc = LocSecurity::ALL.into_iter().collect();
        self.business = BusinessSubtype::ALL.into_iter().collect();
        self
    }

    pub fn with_insurance(mut self, values: impl IntoIterator<Item = Insurance>) -> Self {
        self.insurance = values.into_iter().collect();
        self
    }

    pub fn with_rate_terms(mut self, values: impl IntoIterator<Item = RateTerm>) -> Self {
        self.rate_terms = values.into_iter().collect();
        self
    }

    pub fn with_loc(mut self, values: impl IntoIterator<Item = LocSecurity>) -> Self {
        self.loc = values.into_iter().collect();
        self
    }

    pub fn with_business(mut self, values: impl IntoIterator<Item = BusinessSubtype>) -> Self {
        self.business = values.into_iter().collect();
        self
    }

    pub fn with_combine(mut self, combine: CombineFlags) -> Self {
        self.combine = combine;
        self
    }

    /// Dimensions that apply to the loan type but have nothing selected.
    /// Any such dimension means no series can match.
    pub fn empty_dimensions(&self) -> Vec<FacetDimension> {
        self.loan_type
            .facet_dimensions()
            .iter()
            .copied()
            .filter(|d| match d {
                FacetDimension::Insurance => self.insurance.is_empty(),
                FacetDimension::RateTerm => self.rate_terms.is_empty(),
                FacetDimension::LocSecurity => self.loc.is_empty(),
                FacetDimension::BusinessSubtype => self.business.is_empty(),
            })
            .collect()
    }
}
