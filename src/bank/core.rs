//! Defines the bank account model.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::{Category, normalize_category_key},
    money::Money,
    transaction::Transaction,
};

/// The opaque, client-chosen identifier of a bank account, e.g. the card ID.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BankId(String);

impl BankId {
    /// Create a bank ID.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyBankId] if `id` is empty or just whitespace.
    pub fn new(id: &str) -> Result<Self, Error> {
        if id.trim().is_empty() {
            Err(Error::EmptyBankId)
        } else {
            Ok(Self(id.to_owned()))
        }
    }

    /// Create a bank ID without validation.
    pub fn new_unchecked(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for BankId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BankId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BankId::new(&value)
    }
}

impl From<BankId> for String {
    fn from(value: BankId) -> Self {
        value.0
    }
}

impl Display for BankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bank account the user has connected, with its categories and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    /// The ID of the bank account.
    pub id: BankId,
    /// The display name of the account.
    pub name: String,
    /// How much money is in the account.
    pub balance: Money,
    /// How much the user plans to spend from this account each month.
    #[serde(default)]
    pub monthly_budget: Money,
    /// The account's spending categories in display order.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// The account's transactions, oldest first.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Bank {
    /// Find the category whose name matches `name` ignoring case and surrounding whitespace.
    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        let key = normalize_category_key(name);

        self.categories
            .iter_mut()
            .find(|category| category.name.key() == key)
    }
}

/// The request body for connecting a new bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBank {
    /// The ID of the account, e.g. the card ID.
    pub id: String,
    /// The display name of the account.
    pub name: String,
    /// The opening balance.
    pub balance: Money,
    /// The planned monthly spending.
    #[serde(default)]
    pub monthly_budget: Money,
}

impl TryFrom<NewBank> for Bank {
    type Error = Error;

    fn try_from(new_bank: NewBank) -> Result<Self, Self::Error> {
        Ok(Bank {
            id: BankId::new(&new_bank.id)?,
            name: new_bank.name.trim().to_owned(),
            balance: new_bank.balance,
            monthly_budget: new_bank.monthly_budget,
            categories: Vec::new(),
            transactions: Vec::new(),
        })
    }
}


#[cfg(test)]
mod bank_tests {
    use crate::{
        Money,
        bank::{Bank, BankId, NewBank},
        category::{Category, CategoryName, HexColor},
    };

    #[test]
    fn deserializes_client_payload_with_defaults() {
        let raw = r#"{"id": "card-1", "name": "Everyday", "balance": "250.00"}"#;

        let got: Bank = serde_json::from_str(raw).unwrap();

        assert_eq!(got.id, BankId::new_unchecked("card-1"));
        assert_eq!(got.balance, Money::from_dollars(250));
        assert_eq!(got.monthly_budget, Money::ZERO);
        assert!(got.categories.is_empty());
        assert!(got.transactions.is_empty());
    }

    #[test]
    fn finds_category_ignoring_case() {
        let mut bank = Bank::try_from(NewBank {
            id: "card-1".to_owned(),
            name: "Everyday".to_owned(),
            balance: Money::ZERO,
            monthly_budget: Money::ZERO,
        })
        .unwrap();
        bank.categories.push(Category {
            name: CategoryName::new_unchecked("Groceries"),
            color: HexColor::new_unchecked("#0f0"),
            expenses: Money::ZERO,
        });

        assert!(bank.category_mut(" groceries").is_some());
        assert!(bank.category_mut("rent").is_none());
    }
}
