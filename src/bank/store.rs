//! The per-request working copy of a user's bank accounts.

use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    bank::{Bank, BankId, flush_banks, load_banks},
    category::{Category, CategoryFormData, Reconciliation, reconcile_categories, validate_new_category},
    money::Money,
    transaction::{FilterState, Transaction, TransactionId, filter_transactions},
    transfer::{TransferRequest, transfer},
};

/// A transaction together with the bank whose history it is in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// The bank that owns the transaction.
    pub bank_id: BankId,
    /// The transaction.
    pub transaction: Transaction,
}

/// What the client is told about a completed transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    /// The ID shared by both legs.
    pub id: TransactionId,
    /// When the transfer happened, RFC 3339.
    pub date: String,
    /// How much was sent.
    pub amount: Money,
    /// The bank the money came from.
    pub source_bank_id: BankId,
    /// The source bank's balance after the transfer.
    pub source_balance: Money,
    /// The bank the money went to.
    pub recipient_bank_id: BankId,
    /// The recipient bank's balance after the transfer.
    pub recipient_balance: Money,
}

/// A user's bank accounts, loaded for the duration of one request.
///
/// Every change goes through a method that checks the change first, so the
/// collection is never left half-updated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BankStore {
    banks: Vec<Bank>,
}

impl BankStore {
    /// Wrap a collection of banks.
    pub fn new(banks: Vec<Bank>) -> Self {
        Self { banks }
    }

    /// All banks in display order.
    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    /// Look up a bank by ID.
    ///
    /// # Errors
    ///
    /// Returns [Error::BankNotFound] if there is no bank with the ID.
    pub fn bank(&self, bank_id: &BankId) -> Result<&Bank, Error> {
        self.banks
            .iter()
            .find(|bank| &bank.id == bank_id)
            .ok_or_else(|| Error::BankNotFound(bank_id.clone()))
    }

    fn bank_mut(&mut self, bank_id: &BankId) -> Result<&mut Bank, Error> {
        self.banks
            .iter_mut()
            .find(|bank| &bank.id == bank_id)
            .ok_or_else(|| Error::BankNotFound(bank_id.clone()))
    }

    /// Give up the store and keep the banks.
    pub fn into_banks(self) -> Vec<Bank> {
        self.banks
    }

    /// Add a bank to the end of the collection.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateBankId] if a bank with the same ID is already connected.
    pub fn connect_bank(&mut self, bank: Bank) -> Result<&Bank, Error> {
        if self.banks.iter().any(|existing| existing.id == bank.id) {
            return Err(Error::DuplicateBankId(bank.id));
        }

        self.banks.push(bank);

        Ok(&self.banks[self.banks.len() - 1])
    }

    /// Remove a bank along with its categories and transactions.
    ///
    /// # Errors
    ///
    /// Returns [Error::BankNotFound] if there is no bank with the ID.
    pub fn delete_bank(&mut self, bank_id: &BankId) -> Result<Bank, Error> {
        let index = self
            .banks
            .iter()
            .position(|bank| &bank.id == bank_id)
            .ok_or_else(|| Error::BankNotFound(bank_id.clone()))?;

        Ok(self.banks.remove(index))
    }

    /// Validate and append a category to a bank.
    ///
    /// # Errors
    ///
    /// Returns [Error::BankNotFound] for an unknown bank, otherwise the errors of
    /// [validate_new_category].
    pub fn add_category(
        &mut self,
        bank_id: &BankId,
        form: &CategoryFormData,
    ) -> Result<Category, Error> {
        let bank = self.bank_mut(bank_id)?;
        let category = validate_new_category(&bank.categories, form)?;
        bank.categories.push(category.clone());

        Ok(category)
    }

    /// Replace the categories of a bank, keeping matching categories.
    ///
    /// # Errors
    ///
    /// Returns [Error::BankNotFound] for an unknown bank, otherwise the errors of
    /// [reconcile_categories].
    pub fn replace_categories(
        &mut self,
        bank_id: &BankId,
        incoming: &[Category],
    ) -> Result<Reconciliation, Error> {
        let bank = self.bank_mut(bank_id)?;
        let reconciliation = reconcile_categories(&bank.categories, incoming)?;
        bank.categories = reconciliation.categories.clone();

        Ok(reconciliation)
    }

    /// Move money between two of the banks.
    ///
    /// Nothing changes if the transfer is rejected. See [transfer] for the rules.
    pub fn transfer(
        &mut self,
        request: &TransferRequest,
        now: OffsetDateTime,
    ) -> Result<TransferReceipt, Error> {
        let result = transfer(&self.banks, request, now)?;
        self.banks = result.banks;

        Ok(TransferReceipt {
            id: result.id,
            date: result.date,
            amount: request.amount,
            source_bank_id: request.source_bank_id.clone(),
            source_balance: self.bank(&request.source_bank_id)?.balance,
            recipient_bank_id: request.recipient_bank_id.clone(),
            recipient_balance: self.bank(&request.recipient_bank_id)?.balance,
        })
    }

    /// Every bank's transactions that match `filter`, bank by bank.
    pub fn ledger(&self, filter: &FilterState, now: OffsetDateTime) -> Vec<LedgerEntry> {
        self.banks
            .iter()
            .flat_map(|bank| {
                filter_transactions(&bank.transactions, filter, now)
                    .into_iter()
                    .map(|transaction| LedgerEntry {
                        bank_id: bank.id.clone(),
                        transaction,
                    })
            })
            .collect()
    }
}

/// Load the user's banks, apply `update` and save the result.
///
/// Nothing is saved if `update` fails.
pub fn update_bank_store<T>(
    user_id: UserID,
    connection: &mut Connection,
    update: impl FnOnce(&mut BankStore) -> Result<T, Error>,
) -> Result<T, Error> {
    let mut store = BankStore::new(load_banks(user_id, connection)?);
    let output = update(&mut store)?;
    flush_banks(user_id, store.banks(), connection)?;

    Ok(output)
}
