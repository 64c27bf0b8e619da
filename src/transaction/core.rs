//! Defines the core data model for transactions.

use std::{
    fmt::Display,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{bank::BankId, money::Money};

/// An opaque, client-visible transaction identifier.
///
/// The two legs of a transfer share the same ID.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl TransactionId {
    /// Wrap an existing ID.
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }

    /// Generate a new ID from the current time.
    ///
    /// A process-wide counter is mixed in so that IDs generated within the
    /// same nanosecond still differ.
    pub fn generate(now: OffsetDateTime) -> Self {
        let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);

        Self(format!("txn-{:x}-{:x}", now.unix_timestamp_nanos(), sequence))
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a transaction is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// The bank has not settled the transaction yet.
    Processing,
    /// The money has moved.
    #[default]
    Success,
    /// The bank refused the transaction.
    Declined,
}

impl TransactionStatus {
    /// The name used for the status on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Processing => "PROCESSING",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Declined => "DECLINED",
        }
    }

    /// Parse a stored status, treating anything unknown as still processing.
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "SUCCESS" => TransactionStatus::Success,
            "DECLINED" => TransactionStatus::Declined,
            _ => TransactionStatus::Processing,
        }
    }
}

/// A movement of money on a bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Negative for money leaving the account, positive for money arriving.
    pub amount: Money,
    /// Whether the transaction went through.
    #[serde(default)]
    pub status: TransactionStatus,
    /// When the transaction happened as an ISO-8601 string.
    ///
    /// Kept exactly as received. Transactions whose date cannot be parsed are
    /// left out of filtered views.
    pub date: String,
    /// The name of the category the transaction was booked against.
    #[serde(default)]
    pub category: String,
    /// An optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// The bank that received the money.
    pub recipient_bank_id: BankId,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        id: TransactionId,
        amount: Money,
        date: &str,
        recipient_bank_id: BankId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            id,
            amount,
            date: date.to_owned(),
            status: TransactionStatus::Success,
            category: String::new(),
            note: None,
            recipient_bank_id,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The status defaults to [TransactionStatus::Success], the category to an
/// empty string and the note to `None`.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    id: TransactionId,
    amount: Money,
    date: String,
    status: TransactionStatus,
    category: String,
    note: Option<String>,
    recipient_bank_id: BankId,
}

impl TransactionBuilder {
    /// Set the status of the transaction.
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the category name of the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the note of the transaction.
    pub fn note(mut self, note: Option<&str>) -> Self {
        self.note = note.map(str::to_owned);
        self
    }

    /// Build the transaction.
    pub fn finish(self) -> Transaction {
        Transaction {
            id: self.id,
            amount: self.amount,
            status: self.status,
            date: self.date,
            category: self.category,
            note: self.note,
            recipient_bank_id: self.recipient_bank_id,
        }
    }
}
