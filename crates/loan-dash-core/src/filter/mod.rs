pub mod group_key;
pub mod matcher;
pub mod selection;

pub use group_key::{group_key_for, shorten_label, COMBINED_SELECTED, OVERALL_COMBINED};
pub use matcher::matches;
pub use selection::{
    BusinessSubtype, CombineFlags, FacetDimension, FilterSelection, Insurance, LoanType,
    LocSecurity, Metric, RateTerm,
};
