pub mod dataset;
pub mod period;
pub mod summary;

pub use dataset::{series_key, Dataset, Series, SeriesStore};
pub use period::{resolve_range, Period, PeriodRange, DEFAULT_START};
pub use summary::{LoanTypeCoverage, StoreSummary};
