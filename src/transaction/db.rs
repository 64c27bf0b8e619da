//! Database operations for transactions.

use std::collections::HashSet;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    bank::BankId,
    money::Money,
    transaction::{Transaction, TransactionId, TransactionStatus},
};

/// Initialize the transaction table.
///
/// Must be called after the bank table has been created.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id TEXT NOT NULL,
            bank_id TEXT NOT NULL,
            amount INTEGER NOT NULL,
            status TEXT NOT NULL,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            note TEXT,
            recipient_bank_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY(id, bank_id),
            FOREIGN KEY(bank_id) REFERENCES bank(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_bank_id ON \"transaction\"(bank_id);",
    )?;

    Ok(())
}

/// Retrieve the transactions of a bank in the order they were saved.
pub fn get_transactions(
    bank_id: &BankId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, amount, status, date, category, note, recipient_bank_id
            FROM \"transaction\"
            WHERE bank_id = :bank_id
            ORDER BY position ASC;",
        )?
        .query_map(&[(":bank_id", bank_id.as_ref())], map_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Make the stored transactions of a bank match `transactions`.
///
/// Transactions are matched on their ID. Stored transactions that are not in
/// `transactions` are deleted. If the same ID appears twice, the last one wins.
pub fn save_transactions(
    bank_id: &BankId,
    transactions: &[Transaction],
    connection: &Connection,
) -> Result<(), Error> {
    let keep: HashSet<&str> = transactions
        .iter()
        .map(|transaction| transaction.id.as_ref())
        .collect();

    let stored_ids: Vec<String> = connection
        .prepare("SELECT id FROM \"transaction\" WHERE bank_id = ?1")?
        .query_map([bank_id.as_ref()], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    let mut delete =
        connection.prepare("DELETE FROM \"transaction\" WHERE id = ?1 AND bank_id = ?2")?;
    for id in stored_ids.iter().filter(|id| !keep.contains(id.as_str())) {
        delete.execute((id, bank_id.as_ref()))?;
    }

    let mut upsert = connection.prepare(
        "INSERT INTO \"transaction\"
            (id, bank_id, amount, status, date, category, note, recipient_bank_id, position)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(id, bank_id) DO UPDATE SET
            amount = excluded.amount,
            status = excluded.status,
            date = excluded.date,
            category = excluded.category,
            note = excluded.note,
            recipient_bank_id = excluded.recipient_bank_id,
            position = excluded.position;",
    )?;

    for (position, transaction) in transactions.iter().enumerate() {
        upsert.execute((
            transaction.id.as_ref(),
            bank_id.as_ref(),
            transaction.amount.cents(),
            transaction.status.as_str(),
            &transaction.date,
            &transaction.category,
            transaction.note.as_deref(),
            transaction.recipient_bank_id.as_ref(),
            position as i64,
        ))?;
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_id: String = row.get(0)?;
    let amount = row.get(1)?;
    let raw_status: String = row.get(2)?;
    let raw_recipient: String = row.get(6)?;

    Ok(Transaction {
        id: TransactionId::new(&raw_id),
        amount: Money::from_cents(amount),
        status: TransactionStatus::from_stored(&raw_status),
        date: row.get(3)?,
        category: row.get(4)?,
        note: row.get(5)?,
        recipient_bank_id: BankId::new_unchecked(&raw_recipient),
    })
}
