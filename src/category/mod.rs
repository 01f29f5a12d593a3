//! Categories for grouping expenses.
//!
//! Categories are managed out-of-band with the `add_category` binary, so
//! there are no routes for creating or editing them.

mod db;
mod domain;

pub use db::{create_category, create_category_table, get_all_categories, get_category};
pub use domain::{Category, CategoryId, CategoryName};
