use std::{error::Error, io, path::PathBuf, process::ExitCode};

use clap::Parser;
use rusqlite::Connection;

use expense_tracker::{PasswordHash, ValidatedPassword, get_user_by_username, update_password};

/// Set a new password for a registered user of the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// The username of the user whose password should be changed.
    #[arg(long, short)]
    username: String,
}

fn main() -> ExitCode {
    match reset_password(Args::parse()) {
        Ok(true) => {
            println!("Password updated.");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("Password unchanged.");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("\x1b[31;1mError: {error}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` if the user closed the prompt before entering a password.
fn reset_password(args: Args) -> Result<bool, Box<dyn Error>> {
    if !args.db_path.is_file() {
        return Err(format!("no database file at {}", args.db_path.display()).into());
    }

    let connection = Connection::open(&args.db_path)?;
    let user = get_user_by_username(&args.username, &connection)
        .map_err(|error| format!("could not find the user \"{}\": {error}", args.username))?;
    println!("Changing the password for {} <{}>", user.username, user.email);

    let Some(password) = prompt_for_new_password()? else {
        return Ok(false);
    };

    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;
    update_password(user.id, &password_hash, &connection)?;

    Ok(true)
}

/// Ask for a password until one passes the password rules and is typed the
/// same way twice.
fn prompt_for_new_password() -> io::Result<Option<ValidatedPassword>> {
    loop {
        let Some(password) = prompt("New password: ")? else {
            return Ok(None);
        };

        let validated_password = match ValidatedPassword::new(&password) {
            Ok(validated_password) => validated_password,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };

        let Some(confirmation) = prompt("Confirm new password: ")? else {
            return Ok(None);
        };

        if password == confirmation {
            return Ok(Some(validated_password));
        }

        eprintln!("The passwords do not match, try again.");
    }
}

/// `None` on end of input, e.g. ctrl+d.
fn prompt(message: &str) -> io::Result<Option<String>> {
    match rpassword::prompt_password(message) {
        Ok(input) => Ok(Some(input)),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(error) => Err(error),
    }
}
