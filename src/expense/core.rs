//! Defines the core data models and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, auth::UserID, category::CategoryId, database_id::ExpenseId};

// ============================================================================
// MODELS
// ============================================================================

/// Money spent by a user on something in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// A short description of what the money was spent on.
    pub title: String,
    /// How much was spent, in dollars.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// The user that owns the expense.
    pub user_id: UserID,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
}

/// The user editable fields of an expense.
///
/// Used for both creating and updating expenses. The owner is passed
/// separately so that it always comes from the session, never from a form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// A short description, e.g. "Groceries".
    pub title: String,
    /// The amount spent in dollars.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// The category the expense is filed under. Must exist.
    pub category_id: CategoryId,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new expense owned by `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryNotFound] if `expense.category_id` does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(
    user_id: UserID,
    expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "INSERT INTO expense (title, amount, date, user_id, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, title, amount, date, user_id, category_id",
        )?
        .query_row(
            (
                &expense.title,
                expense.amount,
                expense.date,
                user_id.as_i64(),
                expense.category_id,
            ),
            map_expense_row,
        )
        .map_err(|error| map_foreign_key_error(error, expense.category_id))
}

/// Retrieve the expense `expense_id` if it is owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist or belongs to
/// another user.
pub fn get_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, date, user_id, category_id
             FROM expense
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &expense_id), (":user_id", &user_id.as_i64())],
            map_expense_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of the expenses owned by `user_id`, newest first.
pub fn get_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, date, user_id, category_id
             FROM expense
             WHERE user_id = :user_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Overwrite every editable field of the expense `expense_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if the expense does not exist or belongs to another user,
/// - [Error::CategoryNotFound] if `expense.category_id` does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    expense: NewExpense,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE expense
             SET title = ?1, amount = ?2, date = ?3, category_id = ?4
             WHERE id = ?5 AND user_id = ?6",
            (
                &expense.title,
                expense.amount,
                expense.date,
                expense.category_id,
                expense_id,
                user_id.as_i64(),
            ),
        )
        .map_err(|error| map_foreign_key_error(error, expense.category_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

/// Delete the expense `expense_id` if it is owned by `user_id`.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if the expense does not exist or
/// belongs to another user.
pub fn delete_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (expense_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Initialize the expense table and its indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // The dashboard filters by user and groups by month, so this index speeds up those queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an expense.
///
/// Expects the columns: id, title, amount, date, user_id, category_id.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        user_id: UserID::new(row.get(4)?),
        category_id: row.get(5)?,
    })
}

fn map_foreign_key_error(error: rusqlite::Error, category_id: CategoryId) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::CategoryNotFound(category_id),
        error => error.into(),
    }
}
