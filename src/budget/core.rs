//! The monthly budget model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID, database_id::BudgetId};

/// How much a user plans to spend in a calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget row.
    pub id: BudgetId,
    /// The budgeted amount in dollars.
    pub amount: f64,
    /// The month of the year, 1 for January through to 12 for December.
    pub month: u8,
    /// The calendar year, e.g. 2024.
    pub year: i32,
    /// The user the budget belongs to.
    pub user_id: UserID,
}

/// Set the budget for `user_id` in the given month, replacing any existing
/// budget for that month.
///
/// The insert and the update happen in a single statement, so repeated or
/// concurrent submissions for the same month never create a second row.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidMonth] if `month` is not in 1 to 12,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_budget(
    user_id: UserID,
    amount: f64,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Budget, Error> {
    if !(1..=12).contains(&month) {
        return Err(Error::InvalidMonth(month));
    }

    connection
        .prepare(
            "INSERT INTO budget (amount, month, year, user_id)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id, month, year) DO UPDATE SET amount = excluded.amount
             RETURNING id, amount, month, year, user_id",
        )?
        .query_row((amount, month, year, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Get the budget `user_id` set for the given month.
///
/// # Errors
/// Returns [Error::NotFound] if no budget has been set for that month.
pub fn get_budget(
    user_id: UserID,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "SELECT id, amount, month, year, user_id
             FROM budget
             WHERE user_id = :user_id AND month = :month AND year = :year",
        )?
        .query_row(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":month": month,
                ":year": year,
            },
            map_row,
        )
        .map_err(|error| error.into())
}

/// Initialize the budget table.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY,
                amount REAL NOT NULL,
                month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
                year INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                UNIQUE(user_id, month, year)
                )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        amount: row.get(1)?,
        month: row.get(2)?,
        year: row.get(3)?,
        user_id: UserID::new(row.get(4)?),
    })
}
