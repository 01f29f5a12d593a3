//! Monthly budgets, one per user per calendar month.

mod core;
mod set_endpoint;
mod set_page;

pub use core::{Budget, create_budget_table, get_budget, set_budget};
pub use set_endpoint::set_budget_endpoint;
pub use set_page::get_set_budget_page;
