use crate::filter::selection::{
    BusinessSubtype, FilterSelection, Insurance, LoanType, LocSecurity, RateTerm,
};

// ---------------------------------------------------------------------------
// Per-facet substring rules (label already lower-cased)
// ---------------------------------------------------------------------------

/// Whether a lower-cased label falls in the given rate-term bucket.
///
/// The 1-3 and 3-5 year rules test their two digits independently, so a
/// label with a stray "1 " and "3" elsewhere also qualifies. Known to be
/// loose; kept because group keys and published totals depend on it.
pub fn rate_term_matches(lower: &str, term: RateTerm) -> bool {
    match term {
        RateTerm::Variable => lower.contains("variable rate"),
        RateTerm::FixedUnder1 => lower.contains("fixed rate") && lower.contains("less than 1"),
        RateTerm::Fixed1To3 => {
            lower.contains("fixed rate") && lower.contains("1 ") && lower.contains('3')
        }
        RateTerm::Fixed3To5 => {
            lower.contains("fixed rate") && lower.contains("3 ") && lower.contains('5')
        }
        RateTerm::Fixed5Plus => lower.contains("fixed rate") && lower.contains("5 years and"),
    }
}

pub fn insurance_matches(lower: &str, status: Insurance) -> bool {
    match status {
        Insurance::Insured => lower.contains(" insured"),
        Insurance::Uninsured => lower.contains("uninsured"),
    }
}

/// "secured" is a substring of "unsecured", so a secured selection also
/// admits unsecured lines.
pub fn loc_matches(lower: &str, security: LocSecurity) -> bool {
    match security {
        LocSecurity::Secured => lower.contains("secured"),
        LocSecurity::Unsecured => lower.contains("unsecured"),
    }
}

pub fn business_matches(lower: &str, subtype: BusinessSubtype) -> bool {
    match subtype {
        BusinessSubtype::Regulated => lower.contains("regulated"),
        BusinessSubtype::LeaseReceivables => lower.contains("lease receivables"),
        BusinessSubtype::LoansToIndividuals => lower.contains("individuals and others"),
        BusinessSubtype::NonResidential => lower.contains("non-residential"),
    }
}

/// At least one selected value matches. An empty selection matches nothing.
fn any_selected<'a, T: Copy + 'a>(
    selected: impl IntoIterator<Item = &'a T>,
    rule: impl Fn(T) -> bool,
) -> bool {
    selected.into_iter().any(|v| rule(*v))
}

// ---------------------------------------------------------------------------
// matches
// ---------------------------------------------------------------------------

/// Decide whether the series with `label` belongs in the current view.
///
/// Case-insensitive conjunction of: metric phrase, loan-type phrase, and the
/// sub-facet rules owned by the loan type.
pub fn matches(label: &str, selection: &FilterSelection) -> bool {
    let lower = label.to_lowercase();

    if !lower.contains(selection.metric.phrase()) {
        return false;
    }
    if !lower.contains(selection.loan_type.phrase()) {
        return false;
    }

    match selection.loan_type {
        LoanType::Residential => {
            any_selected(&selection.rate_terms, |t| rate_term_matches(&lower, t))
                && any_selected(&selection.insurance, |s| insurance_matches(&lower, s))
        }
        LoanType::LinesOfCredit => any_selected(&selection.loc, |s| loc_matches(&lower, s)),
        LoanType::Business => any_selected(&selection.business, |s| business_matches(&lower, s)),
        LoanType::AutoLoans | LoanType::CreditCards | LoanType::PersonalOther => true,
    }
}
