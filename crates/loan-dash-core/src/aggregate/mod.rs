pub mod engine;
pub mod view;

pub use engine::{aggregate, DashboardView, GroupSeries, LatestRate};
pub use view::{axis_floor, compute_view, ViewRequest};
