//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    bank::BankId,
    category::{Category, CategoryName, HexColor, Reconciliation, reconcile_categories},
    money::Money,
};

/// Initialize the category table.
///
/// Must be called after the bank table has been created.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            bank_id TEXT NOT NULL,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL,
            color TEXT NOT NULL,
            expenses INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL,
            UNIQUE(bank_id, name_key),
            FOREIGN KEY(bank_id) REFERENCES bank(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_bank_id ON category(bank_id);",
    )?;

    Ok(())
}

/// Retrieve the categories of a bank in their display order.
pub fn get_categories(bank_id: &BankId, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT name, color, expenses FROM category
            WHERE bank_id = :bank_id
            ORDER BY position ASC;",
        )?
        .query_map(&[(":bank_id", bank_id.as_ref())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Make the stored categories of a bank match `categories`.
///
/// Rows are matched by normalized name, so renaming only the case of a
/// category keeps the stored name. Returns what was created, updated and
/// deleted.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if `categories` contains two
/// categories with the same normalized name, or an SQL error.
pub fn save_categories(
    bank_id: &BankId,
    categories: &[Category],
    connection: &Connection,
) -> Result<Reconciliation, Error> {
    let current = get_categories(bank_id, connection)?;
    let reconciliation = reconcile_categories(&current, categories)?;

    for name in &reconciliation.deleted {
        connection.execute(
            "DELETE FROM category WHERE bank_id = ?1 AND name_key = ?2",
            (bank_id.as_ref(), name.key()),
        )?;
    }

    let mut upsert = connection.prepare(
        "INSERT INTO category (bank_id, name, name_key, color, expenses, position)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(bank_id, name_key) DO UPDATE SET
            color = excluded.color,
            expenses = excluded.expenses,
            position = excluded.position;",
    )?;

    for (position, category) in reconciliation.categories.iter().enumerate() {
        upsert.execute((
            bank_id.as_ref(),
            category.name.as_ref(),
            category.name.key(),
            category.color.as_ref(),
            category.expenses.cents(),
            position as i64,
        ))?;
    }

    Ok(reconciliation)
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(0)?;
    let raw_color: String = row.get(1)?;
    let expenses = row.get(2)?;

    Ok(Category {
        name: CategoryName::new_unchecked(&raw_name),
        color: HexColor::new_unchecked(&raw_color),
        expenses: Money::from_cents(expenses),
    })
}
