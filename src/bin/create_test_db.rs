use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

use ledgerlane::{
    Bank, BankId, Category, CategoryName, Email, HexColor, Money, PasswordHash, Transaction,
    TransactionId, ValidatedPassword, create_user, flush_banks, initialize_db,
};

/// A utility for creating a test database for the REST API server of ledgerlane.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user test@example.com...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(Email::new("test@example.com")?, password_hash, &conn)?;

    println!("Connecting demo banks...");

    let banks = demo_banks(OffsetDateTime::now_utc())?;
    flush_banks(user.id, &banks, &mut conn)?;

    println!("Success!");

    Ok(())
}

fn demo_banks(now: OffsetDateTime) -> Result<Vec<Bank>, Box<dyn Error>> {
    let days_ago = |days: i64| (now - Duration::days(days)).format(&Rfc3339);

    let everyday = BankId::new("everyday")?;
    let savings = BankId::new("savings")?;

    let category = |name: &str, color: &str, cents: i64| Category {
        name: CategoryName::new_unchecked(name),
        color: HexColor::new_unchecked(color),
        expenses: Money::from_cents(cents),
    };

    let everyday_bank = Bank {
        id: everyday,
        name: "Everyday".to_owned(),
        balance: Money::from_cents(125_430),
        monthly_budget: Money::from_dollars(2_000),
        categories: vec![
            category("Food", "#f97316", 31_245),
            category("Rent", "#3b82f6", 145_000),
            category("Transport", "#a855f7", 8_620),
        ],
        transactions: vec![
            Transaction::build(
                TransactionId::new("demo-1"),
                Money::from_cents(-4_580),
                &days_ago(0)?,
                BankId::new("grocer")?,
            )
            .category("Food")
            .note(Some("Weekly shop"))
            .finish(),
            Transaction::build(
                TransactionId::new("demo-2"),
                Money::from_cents(-145_000),
                &days_ago(3)?,
                BankId::new("landlord")?,
            )
            .category("Rent")
            .finish(),
            Transaction::build(
                TransactionId::new("demo-3"),
                Money::from_cents(-2_310),
                &days_ago(12)?,
                BankId::new("metro")?,
            )
            .category("Transport")
            .finish(),
        ],
    };

    let savings_bank = Bank {
        id: savings.clone(),
        name: "Savings".to_owned(),
        balance: Money::from_dollars(8_400),
        monthly_budget: Money::ZERO,
        categories: vec![category("Emergency", "#22c55e", 0)],
        transactions: vec![
            Transaction::build(
                TransactionId::new("demo-4"),
                Money::from_dollars(400),
                &days_ago(20)?,
                savings,
            )
            .category("Emergency")
            .note(Some("Monthly top up"))
            .finish(),
        ],
    };

    Ok(vec![everyday_bank, savings_bank])
}
