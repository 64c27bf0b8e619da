#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod http;

pub(crate) use fixtures::{get_test_state, sample_bank, sample_category, sample_transaction};
pub(crate) use http::get_error_message;
