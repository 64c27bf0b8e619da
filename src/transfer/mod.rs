//! Transfers between two of a user's bank accounts.

mod endpoint;
mod engine;

pub use endpoint::create_transfer_endpoint;
pub use engine::{TransferRequest, transfer};
