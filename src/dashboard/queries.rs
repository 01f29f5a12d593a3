//! Database queries that aggregate a user's expenses for the dashboard.

use rusqlite::Connection;
use time::Date;

use crate::{Error, auth::UserID, dashboard::aggregation::CategoryTotal};

/// The sum of every expense owned by `user_id`, or zero if they have none.
pub(super) fn get_total_expense(user_id: UserID, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expense WHERE user_id = ?1",
            (user_id.as_i64(),),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// The total spent per category by `user_id`, largest first.
///
/// Categories with equal totals are ordered by name.
pub(super) fn get_category_breakdown(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT category.name, SUM(expense.amount) AS total
             FROM expense
             INNER JOIN category ON category.id = expense.category_id
             WHERE expense.user_id = ?1
             GROUP BY category.id
             ORDER BY total DESC, category.name ASC",
        )?
        .query_map((user_id.as_i64(),), |row| {
            Ok(CategoryTotal {
                name: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

/// The date and amount of each expense owned by `user_id` dated on or after `since`.
pub(super) fn get_expense_amounts_since(
    user_id: UserID,
    since: Date,
    connection: &Connection,
) -> Result<Vec<(Date, f64)>, Error> {
    connection
        .prepare("SELECT date, amount FROM expense WHERE user_id = ?1 AND date >= ?2")?
        .query_map((user_id.as_i64(), since), |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_amount| maybe_amount.map_err(|error| error.into()))
        .collect()
}
