use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    CategoryName, NewExpense, PasswordHash, ValidatedPassword, create_category, create_expense,
    create_user, initialize_db, set_budget,
};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const CATEGORIES: [&str; 5] = ["Food", "Transport", "Housing", "Entertainment", "Utilities"];

/// (title, amount, days ago, index into [CATEGORIES])
const SAMPLE_EXPENSES: [(&str, f64, i64, usize); 8] = [
    ("Groceries", 84.20, 1, 0),
    ("Bus pass", 45.00, 3, 1),
    ("Rent", 1200.00, 7, 2),
    ("Cinema", 22.50, 12, 3),
    ("Power bill", 96.35, 20, 4),
    ("Takeaways", 31.80, 35, 0),
    ("Fuel", 70.00, 64, 1),
    ("Concert tickets", 150.00, 120, 3),
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
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test-password"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("test", "test@example.com", password_hash, &connection)?;

    println!("Creating categories...");

    let mut categories = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        categories.push(create_category(CategoryName::new(name)?, &connection)?);
    }

    println!("Creating sample expenses...");

    let today = OffsetDateTime::now_utc().date();
    for (title, amount, days_ago, category_index) in SAMPLE_EXPENSES {
        create_expense(
            user.id,
            NewExpense {
                title: title.to_owned(),
                amount,
                date: today - Duration::days(days_ago),
                category_id: categories[category_index].id,
            },
            &connection,
        )?;
    }

    set_budget(user.id, 2000.0, today.month().into(), today.year(), &connection)?;

    println!("Success! Log in with the username \"test\" and the password \"test-password\".");

    Ok(())
}
