use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use expense_tracker::{CategoryName, create_category, initialize_db};

/// A utility for adding an expense category to the database.
///
/// Categories are shared by every user and cannot be created from the web app.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The name of the new category, e.g. "Groceries".
    #[arg(long)]
    name: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);

    if !db_path.is_file() {
        eprintln!("File does not exist at {db_path:#?}!");
        exit(1);
    }

    let name = match CategoryName::new(&args.name) {
        Ok(name) => name,
        Err(error) => {
            eprintln!("Invalid category name: {error}");
            exit(1);
        }
    };

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;

    match create_category(name, &connection) {
        Ok(category) => {
            println!("Added category \"{}\" with ID {}", category.name, category.id);
            Ok(())
        }
        Err(error) => {
            eprintln!("Could not add category: {error}");
            exit(1);
        }
    }
}
