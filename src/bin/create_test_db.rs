use std::{
    error::Error,
    path::Path,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use expense_tracker::{AuthStore, ExpenseData, ExpenseStore, NoteStore, initialize_db};

/// A utility for creating a test database for the expense tracker server.
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

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    initialize_db(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    println!("Creating test user...");
    let user_id = AuthStore::new(conn.clone()).register("test", "test", None)?;

    println!("Creating sample expenses...");
    let expense_store = ExpenseStore::new(conn.clone());
    let sample_expenses = [
        ("Groceries", 82.35, "Food", date!(2024 - 01 - 06)),
        ("Bus pass", 50.0, "Transport", date!(2024 - 01 - 08)),
        ("Electricity", 120.4, "Bills", date!(2024 - 01 - 21)),
        ("Coffee", 4.5, "Food", date!(2024 - 02 - 02)),
        ("Groceries", 76.1, "Food", date!(2024 - 02 - 10)),
        ("Cinema", 18.0, "Entertainment", date!(2024 - 02 - 17)),
        ("Electricity", 98.75, "Bills", date!(2024 - 02 - 20)),
        ("Lunch", 15.0, "Food", date!(2024 - 03 - 01)),
        ("Dinner", 42.0, "Food", date!(2024 - 03 - 15)),
        ("Taxi", 23.9, "Transport", date!(2024 - 03 - 16)),
    ];

    for (name, amount, category, date) in sample_expenses {
        expense_store.add(user_id, ExpenseData::new(name, amount, category, date)?)?;
    }

    println!("Creating sample notes...");
    let note_store = NoteStore::new(conn);
    note_store.add(user_id, "Electricity bill is due on the 20th.")?;
    note_store.add(user_id, "Try to keep takeaways under $50 a month.")?;

    println!("Success! Log in with the username \"test\" and the password \"test\".");

    Ok(())
}
