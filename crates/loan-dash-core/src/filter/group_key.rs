use crate::filter::selection::{FilterSelection, LoanType};

/// Key shared by every series whose dimensions were all combined away.
pub const COMBINED_SELECTED: &str = "Combined Selected";

/// Fallback when shortening strips a label down to nothing.
pub const OVERALL_COMBINED: &str = "Overall Combined Amount";

/// Boilerplate removed from labels of loan types without sub-facets, one
/// pass per group, alternatives tried left to right at each position.
const BOILERPLATE_PASSES: &[&[&str]] = &[
    &["funds advanced", "outstanding balances"],
    &["for non-mortgage loans", "consumer credit", "personal loan plans"],
    &["fixed rate", "variable rate"],
    &["insured", "uninsured", "less than", "more", "years"],
    &[","],
];

/// Compute the display group a matching series collapses into.
///
/// Equal keys merge otherwise distinct series; the combine flags work by
/// dropping their dimension from the key. Candidate order within each
/// dimension is significant: the first substring hit wins.
pub fn group_key_for(label: &str, selection: &FilterSelection) -> String {
    let lower = label.to_lowercase();

    match selection.loan_type {
        LoanType::Residential => {
            let mut parts: Vec<&str> = Vec::new();
            if !selection.combine.insurance {
                if let Some(part) = insurance_part(&lower) {
                    parts.push(part);
                }
            }
            if !selection.combine.rate_term {
                if let Some(part) = rate_term_part(&lower) {
                    parts.push(part);
                }
            }
            if parts.is_empty() {
                COMBINED_SELECTED.to_string()
            } else {
                parts.join(" ")
            }
        }
        LoanType::LinesOfCredit => {
            if selection.combine.loc {
                return COMBINED_SELECTED.to_string();
            }
            if lower.contains("unsecured") {
                "Unsecured".to_string()
            } else if lower.contains("secured") {
                "Secured".to_string()
            } else {
                COMBINED_SELECTED.to_string()
            }
        }
        LoanType::Business => {
            if selection.combine.business {
                return COMBINED_SELECTED.to_string();
            }
            business_part(&lower).unwrap_or(COMBINED_SELECTED).to_string()
        }
        LoanType::AutoLoans | LoanType::CreditCards | LoanType::PersonalOther => {
            shorten_label(label, selection)
        }
    }
}

fn insurance_part(lower: &str) -> Option<&'static str> {
    if lower.contains(" uninsured") {
        Some("Uninsured")
    } else if lower.contains(" insured") {
        Some("Insured")
    } else {
        None
    }
}

fn rate_term_part(lower: &str) -> Option<&'static str> {
    if lower.contains("variable") {
        Some("Variable")
    } else if lower.contains("less than 1") {
        Some("Fixed <1yr")
    } else if lower.contains("1 ") && lower.contains('3') {
        Some("Fixed 1-3yr")
    } else if lower.contains("3 ") && lower.contains('5') {
        Some("Fixed 3-5yr")
    } else if lower.contains("5 years and") {
        Some("Fixed 5yr+")
    } else if lower.contains("fixed") {
        Some("Fixed")
    } else {
        None
    }
}

fn business_part(lower: &str) -> Option<&'static str> {
    if lower.contains("regulated") {
        Some("Regulated Non-Bank")
    } else if lower.contains("lease receivables") {
        Some("Lease Receivables")
    } else if lower.contains("individuals and others") {
        Some("Loans to Individuals")
    } else if lower.contains("non-residential") {
        Some("Non-Residential Mortgages")
    } else {
        None
    }
}

/// Shorten a raw label for display: drop the active metric and loan phrases
/// plus fixed boilerplate (case-insensitive), collapse whitespace.
pub fn shorten_label(label: &str, selection: &FilterSelection) -> String {
    let mut res = strip_phrases(label, &[selection.metric.phrase()]);
    res = strip_phrases(&res, &[selection.loan_type.phrase()]);
    for pass in BOILERPLATE_PASSES {
        res = strip_phrases(&res, pass);
    }

    let collapsed = res.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        OVERALL_COMBINED.to_string()
    } else {
        collapsed
    }
}

/// Remove every case-insensitive occurrence of the (lower-case, ASCII)
/// phrases. At each position the first phrase that matches is removed and
/// scanning resumes after it; removals never create new matches.
fn strip_phrases(input: &str, phrases: &[&str]) -> String {
    let folded = input.to_ascii_lowercase();
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let rest = &folded[pos..];
        if let Some(hit) = phrases.iter().find(|p| !p.is_empty() && rest.starts_with(**p)) {
            pos += hit.len();
            continue;
        }
        let ch_len = input[pos..].chars().next().map_or(1, char::len_utf8);
        out.push_str(&input[pos..pos + ch_len]);
        pos += ch_len;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::selection::{CombineFlags, Metric};

    fn residential(combine: CombineFlags) -> FilterSelection {
        FilterSelection::new(LoanType::Residential, Metric::OutstandingBalances)
            .select_all()
            .with_combine(combine)
    }

    #[test]
    fn test_residential_full_key() {
        let sel = residential(CombineFlags::default());
        assert_eq!(
            group_key_for("Outstanding balances, residential mortgages, insured, variable rate", &sel),
            "Insured Variable"
        );
        assert_eq!(
            group_key_for(
                "Outstanding balances, residential mortgages, uninsured, fixed rate, from 1 year to less than 3 years",
                &sel
            ),
            "Uninsured Fixed 1-3yr"
        );
        assert_eq!(
            group_key_for(
                "Outstanding balances, residential mortgages, insured, fixed rate, less than 1 year",
                &sel
            ),
            "Insured Fixed <1yr"
        );
        assert_eq!(
            group_key_for(
                "Outstanding balances, residential mortgages, uninsured, fixed rate, 5 years and more",
                &sel
            ),
            "Uninsured Fixed 5yr+"
        );
    }

    #[test]
    fn test_residential_priority_order() {
        let sel = residential(CombineFlags::default());
        // "less than 1" wins over the looser 1-3 rule even when a 3 is present.
        assert_eq!(
            group_key_for("residential mortgages, insured, fixed rate, less than 1 year (3)", &sel),
            "Insured Fixed <1yr"
        );
        // 3-5 bucket is checked before 5+.
        assert_eq!(
            group_key_for("residential mortgages, insured, fixed rate, from 3 years to less than 5 years", &sel),
            "Insured Fixed 3-5yr"
        );
        assert_eq!(group_key_for("residential mortgages, fixed rate, other", &sel), "Fixed");
    }

    #[test]
    fn test_residential_combine_flags() {
        let label = "Outstanding balances, residential mortgages, uninsured, variable rate";

        let ins = residential(CombineFlags { insurance: true, ..Default::default() });
        assert_eq!(group_key_for(label, &ins), "Variable");

        let rate = residential(CombineFlags { rate_term: true, ..Default::default() });
        assert_eq!(group_key_for(label, &rate), "Uninsured");

        let both = residential(CombineFlags::all());
        assert_eq!(group_key_for(label, &both), COMBINED_SELECTED);
    }

    #[test]
    fn test_residential_no_suffix_falls_back_to_combined() {
        let sel = residential(CombineFlags::default());
        assert_eq!(
            group_key_for("Outstanding balances, residential mortgages, total", &sel),
            COMBINED_SELECTED
        );
    }

    #[test]
    fn test_loc_keys() {
        let sel = FilterSelection::new(LoanType::LinesOfCredit, Metric::FundsAdvanced).select_all();
        assert_eq!(group_key_for("Funds advanced, lines of credit, unsecured", &sel), "Unsecured");
        assert_eq!(group_key_for("Funds advanced, lines of credit, secured", &sel), "Secured");
        assert_eq!(group_key_for("Funds advanced, lines of credit", &sel), COMBINED_SELECTED);

        let combined = sel.with_combine(CombineFlags { loc: true, ..Default::default() });
        assert_eq!(
            group_key_for("Funds advanced, lines of credit, unsecured", &combined),
            COMBINED_SELECTED
        );
    }

    #[test]
    fn test_business_keys_in_priority_order() {
        let sel = FilterSelection::new(LoanType::Business, Metric::OutstandingBalances).select_all();
        let cases = [
            ("business loans, regulated non-bank", "Regulated Non-Bank"),
            ("business loans, lease receivables", "Lease Receivables"),
            ("business loans, loans to individuals and others", "Loans to Individuals"),
            ("business loans, non-residential mortgages", "Non-Residential Mortgages"),
            ("business loans, regulated, lease receivables", "Regulated Non-Bank"),
            ("business loans, total", COMBINED_SELECTED),
        ];
        for (label, expected) in cases {
            assert_eq!(group_key_for(label, &sel), expected, "{}", label);
        }

        let combined = sel.with_combine(CombineFlags { business: true, ..Default::default() });
        assert_eq!(
            group_key_for("business loans, lease receivables", &combined),
            COMBINED_SELECTED
        );
    }

    #[test]
    fn test_shorten_label_strips_boilerplate() {
        let sel = FilterSelection::new(LoanType::CreditCards, Metric::OutstandingBalances);
        assert_eq!(
            group_key_for("Outstanding balances, credit card, consumer credit", &sel),
            OVERALL_COMBINED
        );
        assert_eq!(
            group_key_for("Outstanding balances, credit card, Charge Cards", &sel),
            "Charge Cards"
        );

        let auto = FilterSelection::new(LoanType::AutoLoans, Metric::FundsAdvanced);
        assert_eq!(
            group_key_for("Funds advanced, Auto loans, new vehicles", &auto),
            "new vehicles"
        );
    }

    #[test]
    fn test_strip_phrases_alternation_is_positional() {
        // "uninsured" is removed whole rather than leaving "un" behind.
        assert_eq!(strip_phrases("a uninsured b", &["insured", "uninsured"]), "a  b");
        assert_eq!(strip_phrases("MORE or less", &["more"]), " or less");
        assert_eq!(strip_phrases("café, x", &[","]), "café x");
    }

    #[test]
    fn test_group_key_idempotent() {
        let sel = residential(CombineFlags::default());
        let label = "Outstanding balances, residential mortgages, insured, variable rate";
        assert_eq!(group_key_for(label, &sel), group_key_for(label, &sel));
    }
}
