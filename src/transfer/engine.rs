//! Moving money between two of a user's bank accounts.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    bank::{Bank, BankId},
    money::Money,
    transaction::{Transaction, TransactionId, TransactionStatus},
};

/// The request body for a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// The bank the money is taken from.
    pub source_bank_id: BankId,
    /// The bank the money is sent to.
    pub recipient_bank_id: BankId,
    /// How much to send. Must be greater than zero.
    pub amount: Money,
    /// The category to book the transfer against.
    #[serde(default)]
    pub category: String,
    /// An optional note stored on both legs.
    #[serde(default)]
    pub note: Option<String>,
}

/// The result of a successful transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    /// The full bank collection with the transfer applied.
    pub banks: Vec<Bank>,
    /// The ID shared by the debit and credit legs.
    pub id: TransactionId,
    /// The RFC 3339 timestamp shared by both legs.
    pub date: String,
}

/// Send `request.amount` from the source bank to the recipient bank.
///
/// The input is left untouched. On success, the returned collection has:
/// - the amount taken from the source balance and added to the recipient balance,
/// - a debit leg (negative amount) appended to the source's transactions,
/// - a credit leg (positive amount) appended to the recipient's transactions,
/// - the amount added to the expenses of the source category matching `request.category`, if any.
///
/// Both legs share the same ID and timestamp and name the recipient bank.
///
/// # Errors
///
/// - [Error::BankNotFound] if either bank is not in `banks`.
/// - [Error::SelfTransfer] if the source and recipient are the same bank.
/// - [Error::InvalidAmount] if the amount is zero or negative, or a new
///   balance or category total would overflow.
/// - [Error::InsufficientBalance] unless the source balance is strictly greater than the amount.
pub fn transfer(
    banks: &[Bank],
    request: &TransferRequest,
    now: OffsetDateTime,
) -> Result<Transfer, Error> {
    let source_index = find_bank(banks, &request.source_bank_id)?;
    let recipient_index = find_bank(banks, &request.recipient_bank_id)?;

    if source_index == recipient_index {
        return Err(Error::SelfTransfer);
    }

    let amount = request.amount;
    if !amount.is_positive() {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    let balance = banks[source_index].balance;
    if balance <= amount {
        return Err(Error::InsufficientBalance { balance, amount });
    }

    let date = now
        .format(&Rfc3339)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), now.to_string()))?;
    let id = TransactionId::generate(now);

    let leg = |amount: Money| {
        Transaction::build(
            id.clone(),
            amount,
            &date,
            request.recipient_bank_id.clone(),
        )
        .status(TransactionStatus::Success)
        .category(&request.category)
        .note(request.note.as_deref())
        .finish()
    };
    let debit = leg(Money::ZERO.checked_sub(amount)?);
    let credit = leg(amount);

    let source_balance = balance.checked_sub(amount)?;
    let recipient_balance = banks[recipient_index].balance.checked_add(amount)?;

    let mut banks = banks.to_vec();

    let source = &mut banks[source_index];
    source.balance = source_balance;
    source.transactions.push(debit);
    if let Some(category) = source.category_mut(&request.category) {
        category.expenses = category.expenses.checked_add(amount)?;
    }

    let recipient = &mut banks[recipient_index];
    recipient.balance = recipient_balance;
    recipient.transactions.push(credit);

    Ok(Transfer { banks, id, date })
}

fn find_bank(banks: &[Bank], id: &BankId) -> Result<usize, Error> {
    banks
        .iter()
        .position(|bank| &bank.id == id)
        .ok_or_else(|| Error::BankNotFound(id.clone()))
}

#[cfg(test)]
mod transfer_tests {
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        Error, Money,
        bank::{Bank, BankId},
        category::{Category, CategoryName, HexColor},
        transaction::TransactionStatus,
    };

    use super::{TransferRequest, transfer};

    const NOW: OffsetDateTime = datetime!(2025-03-15 12:00 UTC);

    fn bank(id: &str, dollars: i64) -> Bank {
        Bank {
            id: BankId::new_unchecked(id),
            name: format!("Bank {id}"),
            balance: Money::from_dollars(dollars),
            monthly_budget: Money::ZERO,
            categories: vec![Category {
                name: CategoryName::new_unchecked("Savings"),
                color: HexColor::new_unchecked("#00f"),
                expenses: Money::from_dollars(5),
            }],
            transactions: Vec::new(),
        }
    }

    fn request(source: &str, recipient: &str, dollars: i64) -> TransferRequest {
        TransferRequest {
            source_bank_id: BankId::new_unchecked(source),
            recipient_bank_id: BankId::new_unchecked(recipient),
            amount: Money::from_dollars(dollars),
            category: "savings".to_owned(),
            note: Some("rainy day".to_owned()),
        }
    }

    #[test]
    fn moves_money_and_records_both_legs() {
        let banks = vec![bank("a", 100), bank("b", 50)];

        let got = transfer(&banks, &request("a", "b", 30), NOW).unwrap();

        let (source, recipient) = (&got.banks[0], &got.banks[1]);
        assert_eq!(source.balance, Money::from_dollars(70));
        assert_eq!(recipient.balance, Money::from_dollars(80));

        assert_eq!(source.transactions.len(), 1);
        assert_eq!(recipient.transactions.len(), 1);
        let debit = &source.transactions[0];
        let credit = &recipient.transactions[0];
        assert_eq!(debit.id, got.id);
        assert_eq!(credit.id, got.id);
        assert_eq!(debit.amount, Money::from_dollars(-30));
        assert_eq!(credit.amount, Money::from_dollars(30));
        assert_eq!(debit.date, "2025-03-15T12:00:00Z");
        assert_eq!(debit.date, credit.date);
        assert_eq!(debit.status, TransactionStatus::Success);
        assert_eq!(debit.recipient_bank_id, BankId::new_unchecked("b"));
        assert_eq!(credit.recipient_bank_id, BankId::new_unchecked("b"));
        assert_eq!(credit.note.as_deref(), Some("rainy day"));
    }

    #[test]
    fn adds_amount_to_matching_source_category() {
        let banks = vec![bank("a", 100), bank("b", 50)];

        let got = transfer(&banks, &request("a", "b", 30), NOW).unwrap();

        assert_eq!(got.banks[0].categories[0].expenses, Money::from_dollars(35));
        assert_eq!(got.banks[1].categories[0].expenses, Money::from_dollars(5));
    }

    #[test]
    fn input_is_not_modified() {
        let banks = vec![bank("a", 100), bank("b", 50)];
        let before = banks.clone();

        transfer(&banks, &request("a", "b", 30), NOW).unwrap();

        assert_eq!(banks, before);
    }

    #[test]
    fn sending_the_whole_balance_fails() {
        let banks = vec![bank("a", 100), bank("b", 50)];

        let got = transfer(&banks, &request("a", "b", 100), NOW);

        assert_eq!(
            got,
            Err(Error::InsufficientBalance {
                balance: Money::from_dollars(100),
                amount: Money::from_dollars(100),
            })
        );
    }

    #[test]
    fn unknown_bank_is_not_found() {
        let banks = vec![bank("a", 100), bank("b", 50)];

        assert_eq!(
            transfer(&banks, &request("a", "zzz", 10), NOW),
            Err(Error::BankNotFound(BankId::new_unchecked("zzz")))
        );
        assert_eq!(
            transfer(&banks, &request("zzz", "b", 10), NOW),
            Err(Error::BankNotFound(BankId::new_unchecked("zzz")))
        );
    }

    #[test]
    fn overflowing_recipient_balance_is_rejected() {
        let mut full = bank("b", 0);
        full.balance = Money::from_cents(i64::MAX - 100);
        let banks = vec![bank("a", 100), full];

        let got = transfer(&banks, &request("a", "b", 30), NOW);

        assert!(matches!(got, Err(Error::InvalidAmount(_))), "{got:?}");
    }

    #[test]
    fn overflowing_category_expenses_are_rejected() {
        let mut source = bank("a", 100);
        source.categories[0].expenses = Money::from_cents(i64::MAX);
        let banks = vec![source, bank("b", 50)];

        let got = transfer(&banks, &request("a", "b", 30), NOW);

        assert!(matches!(got, Err(Error::InvalidAmount(_))), "{got:?}");
    }

    #[test]
    fn self_transfer_is_rejected() {
        let banks = vec![bank("a", 100)];

        assert_eq!(
            transfer(&banks, &request("a", "a", 10), NOW),
            Err(Error::SelfTransfer)
        );
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let banks = vec![bank("a", 100), bank("b", 50)];

        for dollars in [0, -10] {
            let got = transfer(&banks, &request("a", "b", dollars), NOW);
            assert!(matches!(got, Err(Error::InvalidAmount(_))), "{dollars}: {got:?}");
        }
    }
}
