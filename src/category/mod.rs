//! Spending categories of a bank and how edits to them are merged.

mod create_endpoint;
mod db;
mod domain;
mod reconcile;
mod replace_endpoint;

pub use create_endpoint::create_category_endpoint;
pub use db::{create_category_table, get_categories, save_categories};
pub use domain::{Category, CategoryFormData, CategoryName, HexColor, normalize_category_key};
pub use reconcile::{Reconciliation, reconcile_categories, validate_new_category};
pub use replace_endpoint::replace_categories_endpoint;
