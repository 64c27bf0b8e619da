//! Connected bank accounts and the per-request store that changes them.

mod core;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod list_endpoint;
mod state;
mod store;
mod sync_endpoint;

pub use core::{Bank, BankId, NewBank};
pub use create_endpoint::connect_bank_endpoint;
pub use db::{bank_id_taken, create_bank_table, flush_banks, load_banks};
pub use delete_endpoint::delete_bank_endpoint;
pub use list_endpoint::get_banks_endpoint;
pub use state::BankState;
pub use store::{BankStore, LedgerEntry, TransferReceipt, update_bank_store};
pub use sync_endpoint::sync_banks_endpoint;
