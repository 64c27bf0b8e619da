//! Loading and saving a user's whole bank collection.

use std::collections::HashSet;

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    auth::UserID,
    bank::{Bank, BankId},
    category::{get_categories, save_categories},
    money::Money,
    transaction::{get_transactions, save_transactions},
};

/// Initialize the bank table.
///
/// Must be called after the user table has been created.
pub fn create_bank_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS bank (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            balance INTEGER NOT NULL,
            monthly_budget INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_bank_user_id ON bank(user_id);",
    )?;

    Ok(())
}

/// Load the user's banks, with their categories and transactions, in display order.
///
/// Returns an empty list if the user has no banks.
pub fn load_banks(user_id: UserID, connection: &Connection) -> Result<Vec<Bank>, Error> {
    let banks: Vec<Bank> = connection
        .prepare(
            "SELECT id, name, balance, monthly_budget FROM bank
            WHERE user_id = :user_id
            ORDER BY position ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .collect::<Result<_, _>>()?;

    banks
        .into_iter()
        .map(|mut bank| {
            bank.categories = get_categories(&bank.id, connection)?;
            bank.transactions = get_transactions(&bank.id, connection)?;
            Ok(bank)
        })
        .collect()
}

/// Whether any user has a bank with the ID.
pub fn bank_id_taken(bank_id: &BankId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row("SELECT EXISTS(SELECT 1 FROM bank WHERE id = ?1)", [bank_id.as_ref()], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Make the stored banks of a user match `banks`.
///
/// All changes are made in one SQL transaction:
/// - the user's stored banks that are not in `banks` are deleted along with their
///   categories and transactions,
/// - every bank in `banks` is inserted or updated,
/// - each bank's categories are reconciled by normalized name,
/// - each bank's transactions are inserted, updated or deleted by ID.
///
/// # Errors
///
/// - [Error::DuplicateBankId] if two banks in `banks` share an ID.
/// - [Error::BankNotFound] if a bank ID belongs to another user.
/// - [Error::DuplicateCategoryName] if a bank has two categories with the same normalized name.
///
/// Nothing is written if an error is returned.
pub fn flush_banks(user_id: UserID, banks: &[Bank], connection: &mut Connection) -> Result<(), Error> {
    let mut incoming_ids = HashSet::with_capacity(banks.len());
    for bank in banks {
        if !incoming_ids.insert(bank.id.as_ref()) {
            return Err(Error::DuplicateBankId(bank.id.clone()));
        }
    }

    let transaction = connection.transaction()?;

    {
        let mut get_owner = transaction.prepare("SELECT user_id FROM bank WHERE id = ?1")?;
        for bank in banks {
            let owner: Option<i64> = get_owner
                .query_row([bank.id.as_ref()], |row| row.get(0))
                .optional()?;

            match owner {
                Some(owner) if owner != user_id.as_i64() => {
                    return Err(Error::BankNotFound(bank.id.clone()));
                }
                _ => {}
            }
        }

        let stored_ids: Vec<String> = transaction
            .prepare("SELECT id FROM bank WHERE user_id = ?1")?
            .query_map([user_id.as_i64()], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        let mut delete = transaction.prepare("DELETE FROM bank WHERE id = ?1")?;
        for id in stored_ids
            .iter()
            .filter(|id| !incoming_ids.contains(id.as_str()))
        {
            delete.execute([id])?;
        }

        let mut upsert = transaction.prepare(
            "INSERT INTO bank (id, user_id, name, balance, monthly_budget, position)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                balance = excluded.balance,
                monthly_budget = excluded.monthly_budget,
                position = excluded.position;",
        )?;

        for (position, bank) in banks.iter().enumerate() {
            upsert.execute((
                bank.id.as_ref(),
                user_id.as_i64(),
                &bank.name,
                bank.balance.cents(),
                bank.monthly_budget.cents(),
                position as i64,
            ))?;

            save_categories(&bank.id, &bank.categories, &transaction)?;
            save_transactions(&bank.id, &bank.transactions, &transaction)?;
        }
    }

    transaction.commit()?;

    tracing::debug!("saved {} banks for user {user_id}", banks.len());

    Ok(())
}

fn map_row(row: &Row) -> Result<Bank, rusqlite::Error> {
    let raw_id: String = row.get(0)?;
    let balance = row.get(2)?;
    let monthly_budget = row.get(3)?;

    Ok(Bank {
        id: BankId::new_unchecked(&raw_id),
        name: row.get(1)?,
        balance: Money::from_cents(balance),
        monthly_budget: Money::from_cents(monthly_budget),
        categories: Vec::new(),
        transactions: Vec::new(),
    })
}

#[cfg(test)]
mod bank_db_tests {
    use rusqlite::Connection;

    use crate::{
        Error, Money,
        auth::{Email, PasswordHash, UserID, create_user},
        bank::{Bank, BankId},
        category::{Category, CategoryName, HexColor},
        db::initialize,
        transaction::{Transaction, TransactionId},
    };

    use super::{bank_id_taken, flush_banks, load_banks};

    fn get_test_connection() -> (Connection, UserID, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let me = create_user(
            Email::new_unchecked("me@example.com"),
            PasswordHash::new_unchecked("hash"),
            &connection,
        )
        .unwrap();
        let other = create_user(
            Email::new_unchecked("other@example.com"),
            PasswordHash::new_unchecked("hash"),
            &connection,
        )
        .unwrap();

        (connection, me.id, other.id)
    }

    fn category(name: &str, expenses: i64) -> Category {
        Category {
            name: CategoryName::new_unchecked(name),
            color: HexColor::new_unchecked("#abc"),
            expenses: Money::from_dollars(expenses),
        }
    }

    fn bank(id: &str, dollars: i64) -> Bank {
        Bank {
            id: BankId::new_unchecked(id),
            name: format!("Bank {id}"),
            balance: Money::from_dollars(dollars),
            monthly_budget: Money::from_dollars(400),
            categories: vec![category("Food", 20), category("Rent", 900)],
            transactions: vec![
                Transaction::build(
                    TransactionId::new(&format!("{id}-1")),
                    Money::from_cents(-1999),
                    "2025-03-01T10:00:00Z",
                    BankId::new_unchecked("elsewhere"),
                )
                .category("Food")
                .note(Some("lunch"))
                .finish(),
            ],
        }
    }

    #[test]
    fn load_without_banks_is_empty() {
        let (connection, me, _) = get_test_connection();

        assert_eq!(load_banks(me, &connection), Ok(Vec::new()));
    }

    #[test]
    fn flush_then_load_round_trips() {
        let (mut connection, me, _) = get_test_connection();
        let want = vec![bank("b", 50), bank("a", 100)];

        flush_banks(me, &want, &mut connection).unwrap();
        let got = load_banks(me, &connection).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn flush_mirrors_removed_banks_categories_and_transactions() {
        let (mut connection, me, _) = get_test_connection();
        flush_banks(me, &[bank("a", 100), bank("b", 50)], &mut connection).unwrap();

        let mut kept = bank("a", 75);
        kept.categories = vec![category("food", 25)];
        kept.transactions.clear();
        flush_banks(me, std::slice::from_ref(&kept), &mut connection).unwrap();
        let got = load_banks(me, &connection).unwrap();

        let mut want = kept;
        want.categories = vec![category("Food", 25)];
        assert_eq!(got, vec![want]);

        let orphaned: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM \"transaction\" WHERE bank_id = 'b'",
                (),
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphaned, 0);
    }

    #[test]
    fn flush_only_touches_the_users_banks() {
        let (mut connection, me, other) = get_test_connection();
        flush_banks(other, &[bank("theirs", 10)], &mut connection).unwrap();

        flush_banks(me, &[bank("mine", 10)], &mut connection).unwrap();

        assert_eq!(load_banks(other, &connection).unwrap(), vec![bank("theirs", 10)]);
        assert_eq!(load_banks(me, &connection).unwrap(), vec![bank("mine", 10)]);
    }

    #[test]
    fn flush_rejects_another_users_bank_id() {
        let (mut connection, me, other) = get_test_connection();
        flush_banks(other, &[bank("theirs", 10)], &mut connection).unwrap();

        let got = flush_banks(me, &[bank("theirs", 99)], &mut connection);

        assert_eq!(got, Err(Error::BankNotFound(BankId::new_unchecked("theirs"))));
        assert_eq!(load_banks(other, &connection).unwrap(), vec![bank("theirs", 10)]);
    }

    #[test]
    fn flush_rejects_duplicate_ids() {
        let (mut connection, me, _) = get_test_connection();

        let got = flush_banks(me, &[bank("a", 1), bank("a", 2)], &mut connection);

        assert_eq!(got, Err(Error::DuplicateBankId(BankId::new_unchecked("a"))));
    }

    #[test]
    fn failed_flush_writes_nothing() {
        let (mut connection, me, _) = get_test_connection();
        flush_banks(me, &[bank("a", 100)], &mut connection).unwrap();

        let mut broken = bank("a", 1);
        broken.categories = vec![category("Food", 1), category("FOOD", 2)];
        let got = flush_banks(me, &[broken], &mut connection);

        assert!(matches!(got, Err(Error::DuplicateCategoryName(_))));
        assert_eq!(load_banks(me, &connection).unwrap(), vec![bank("a", 100)]);
    }

    #[test]
    fn bank_id_taken_checks_every_user() {
        let (mut connection, _, other) = get_test_connection();
        flush_banks(other, &[bank("theirs", 10)], &mut connection).unwrap();

        assert_eq!(bank_id_taken(&BankId::new_unchecked("theirs"), &connection), Ok(true));
        assert_eq!(bank_id_taken(&BankId::new_unchecked("free"), &connection), Ok(false));
    }
}
