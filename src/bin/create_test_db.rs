use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use ledger_rs::{SQLiteLedger, TransactionForm, create_transaction, initialize_db};

/// A utility for creating a test database for the REST API server of ledger_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const SAMPLE_TRANSACTIONS: [(&str, f64, &str, &str); 5] = [
    ("Salary", 4200.0, "income", "Job"),
    ("Rent", 1450.0, "outcome", "Housing"),
    ("Groceries", 183.27, "outcome", "Food"),
    ("Freelance website", 800.0, "income", "Side projects"),
    ("Takeaways", 42.5, "outcome", "Food"),
];

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
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample transactions...");

    let ledger = SQLiteLedger::new(&conn);
    for (title, value, transaction_type, category) in SAMPLE_TRANSACTIONS {
        create_transaction(
            TransactionForm {
                title: title.to_owned(),
                value,
                transaction_type: transaction_type.to_owned(),
                category: category.to_owned(),
            },
            &ledger,
        )?;
    }

    println!("Success!");

    Ok(())
}
