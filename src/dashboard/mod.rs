//! Dashboard module
//!
//! Provides an overview page showing a user's total spending, their budget
//! for the current month, spending per category, the last twelve months of
//! spending and a list of their expenses.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod queries;
mod snapshot;
mod tables;

pub use aggregation::{CategoryTotal, MonthlyTotal, TopCategory};
pub use handlers::get_dashboard_page;
pub use snapshot::{DashboardSnapshot, get_dashboard_snapshot};
