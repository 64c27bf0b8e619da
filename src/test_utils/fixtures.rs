use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Money,
    auth::{Email, PasswordHash, User, create_user},
    bank::{Bank, BankId, flush_banks},
    category::{Category, CategoryName, HexColor},
    db::initialize,
    transaction::{Transaction, TransactionId},
};

/// An initialized in-memory database with one registered user.
fn get_test_connection() -> (Connection, User) {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    let user = create_user(
        Email::new_unchecked("test@example.com"),
        PasswordHash::new_unchecked("hunter2"),
        &connection,
    )
    .expect("Could not create test user");

    (connection, user)
}

/// A shareable connection where the test user already owns `banks`.
pub(crate) fn get_test_state(banks: &[Bank]) -> (Arc<Mutex<Connection>>, User) {
    let (mut connection, user) = get_test_connection();
    flush_banks(user.id, banks, &mut connection).expect("Could not save test banks");

    (Arc::new(Mutex::new(connection)), user)
}

pub(crate) fn sample_category(name: &str, color: &str, dollars: i64) -> Category {
    Category {
        name: CategoryName::new_unchecked(name),
        color: HexColor::new_unchecked(color),
        expenses: Money::from_dollars(dollars),
    }
}

pub(crate) fn sample_transaction(
    id: &str,
    dollars: i64,
    date: &str,
    category: &str,
    recipient_bank_id: &str,
) -> Transaction {
    Transaction::build(
        TransactionId::new(id),
        Money::from_dollars(dollars),
        date,
        BankId::new_unchecked(recipient_bank_id),
    )
    .category(category)
    .finish()
}

/// A bank with a single "Food" category and no transactions.
pub(crate) fn sample_bank(id: &str, dollars: i64) -> Bank {
    Bank {
        id: BankId::new_unchecked(id),
        name: format!("Bank {id}"),
        balance: Money::from_dollars(dollars),
        monthly_budget: Money::from_dollars(500),
        categories: vec![sample_category("Food", "#f97316", 0)],
        transactions: Vec::new(),
    }
}
