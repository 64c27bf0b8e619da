//! Bank transactions and the filters used to browse them.

mod core;
mod db;
mod filter;
mod list_endpoint;
mod query;

pub use core::{Transaction, TransactionId, TransactionStatus};
pub use db::{create_transaction_table, get_transactions, save_transactions};
pub use filter::{AmountRange, DateFilter, DatePreset, DateRange, FilterState, filter_transactions};
pub use list_endpoint::get_transactions_endpoint;
pub use query::FilterQuery;
