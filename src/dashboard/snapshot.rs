//! Builds the dashboard snapshot for a user.

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    auth::UserID,
    budget::{Budget, get_budget},
    dashboard::{
        aggregation::{
            CategoryTotal, MonthlyTotal, TopCategory, monthly_trend, top_categories,
            trend_start_date,
        },
        queries::{get_category_breakdown, get_expense_amounts_since, get_total_expense},
    },
};

/// Aggregated spending figures for one user as of a reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// The sum of all of the user's expenses.
    pub total_expense: f64,
    /// The budget for the month of the reference date, if one has been set.
    pub current_budget: Option<Budget>,
    /// The budget minus `total_expense`, only present when there is a budget.
    pub remaining: Option<f64>,
    /// Spending per category, largest first.
    pub category_breakdown: Vec<CategoryTotal>,
    /// The three largest categories with their share of the total.
    pub top_categories: Vec<TopCategory>,
    /// Spending in each of the twelve months ending at the reference date, oldest first.
    pub monthly_trend: Vec<MonthlyTotal>,
}

/// Compute the dashboard snapshot for `user_id` relative to `reference_date`.
///
/// Only expenses owned by `user_id` are included. `reference_date` selects the
/// budget month and the last month of the spending trend.
///
/// # Errors
/// Returns an error if any of the underlying queries fail.
pub fn get_dashboard_snapshot(
    user_id: UserID,
    reference_date: Date,
    connection: &Connection,
) -> Result<DashboardSnapshot, Error> {
    let total_expense = get_total_expense(user_id, connection)?;

    let current_budget = match get_budget(
        user_id,
        reference_date.month().into(),
        reference_date.year(),
        connection,
    ) {
        Ok(budget) => Some(budget),
        Err(Error::NotFound) => None,
        Err(error) => return Err(error),
    };
    let remaining = current_budget
        .as_ref()
        .map(|budget| budget.amount - total_expense);

    let category_breakdown = get_category_breakdown(user_id, connection)?;
    let top_categories = top_categories(&category_breakdown, total_expense);

    let trend_expenses = match trend_start_date(reference_date) {
        Some(since) => get_expense_amounts_since(user_id, since, connection)?,
        None => Vec::new(),
    };
    let monthly_trend = monthly_trend(reference_date, &trend_expenses);

    Ok(DashboardSnapshot {
        total_expense,
        current_budget,
        remaining,
        category_breakdown,
        top_categories,
        monthly_trend,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        auth::UserID,
        budget::set_budget,
        category::CategoryId,
        dashboard::aggregation::{CategoryTotal, TopCategory},
        expense::{NewExpense, create_expense},
        test_utils::{create_test_category, create_test_user, get_test_connection},
    };

    use super::get_dashboard_snapshot;

    fn add_expense(
        user_id: UserID,
        category_id: CategoryId,
        amount: f64,
        date: Date,
        connection: &Connection,
    ) {
        create_expense(
            user_id,
            NewExpense {
                title: "Expense".to_owned(),
                amount,
                date,
                category_id,
            },
            connection,
        )
        .unwrap();
    }

    #[test]
    fn snapshot_for_example_expenses() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let food = create_test_category("Food", &connection);
        let transport = create_test_category("Transport", &connection);
        add_expense(user.id, food.id, 100.0, date!(2024 - 01 - 05), &connection);
        add_expense(user.id, food.id, 50.0, date!(2024 - 01 - 10), &connection);
        add_expense(
            user.id,
            transport.id,
            30.0,
            date!(2024 - 01 - 12),
            &connection,
        );

        let snapshot = get_dashboard_snapshot(user.id, date!(2024 - 01 - 31), &connection).unwrap();

        assert_eq!(snapshot.total_expense, 180.0);
        assert_eq!(
            snapshot.category_breakdown,
            vec![
                CategoryTotal {
                    name: "Food".to_owned(),
                    total: 150.0
                },
                CategoryTotal {
                    name: "Transport".to_owned(),
                    total: 30.0
                },
            ]
        );
        assert_eq!(
            snapshot.top_categories,
            vec![
                TopCategory {
                    name: "Food".to_owned(),
                    total: 150.0,
                    percentage: 83.3
                },
                TopCategory {
                    name: "Transport".to_owned(),
                    total: 30.0,
                    percentage: 16.7
                },
            ]
        );
        assert_eq!(snapshot.monthly_trend.len(), 12);
        let last_month = snapshot.monthly_trend.last().unwrap();
        assert_eq!(last_month.label, "Jan 2024");
        assert_eq!(last_month.total, 180.0);
        assert_eq!(snapshot.current_budget, None);
        assert_eq!(snapshot.remaining, None);
    }

    #[test]
    fn breakdown_sums_to_total() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let categories = ["Food", "Rent", "Fun", "Travel"]
            .map(|name| create_test_category(name, &connection).id);
        for (i, category_id) in categories.iter().enumerate() {
            add_expense(
                user.id,
                *category_id,
                (i as f64 + 1.0) * 12.25,
                date!(2023 - 06 - 01),
                &connection,
            );
        }

        let snapshot = get_dashboard_snapshot(user.id, date!(2024 - 01 - 31), &connection).unwrap();

        let breakdown_sum: f64 = snapshot
            .category_breakdown
            .iter()
            .map(|category| category.total)
            .sum();
        assert_eq!(breakdown_sum, snapshot.total_expense);
        assert_eq!(snapshot.top_categories.len(), 3);
    }

    #[test]
    fn remaining_is_budget_minus_total() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let food = create_test_category("Food", &connection);
        add_expense(user.id, food.id, 120.0, date!(2024 - 03 - 02), &connection);
        set_budget(user.id, 500.0, 3, 2024, &connection).unwrap();
        // Budgets for other months are ignored.
        set_budget(user.id, 10.0, 2, 2024, &connection).unwrap();

        let snapshot = get_dashboard_snapshot(user.id, date!(2024 - 03 - 15), &connection).unwrap();

        assert_eq!(snapshot.current_budget.map(|budget| budget.amount), Some(500.0));
        assert_eq!(snapshot.remaining, Some(380.0));
    }

    #[test]
    fn empty_snapshot_for_user_without_expenses() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let other_user = create_test_user("bob", &connection);
        let food = create_test_category("Food", &connection);
        add_expense(
            other_user.id,
            food.id,
            99.0,
            date!(2024 - 03 - 02),
            &connection,
        );

        let snapshot = get_dashboard_snapshot(user.id, date!(2024 - 03 - 15), &connection).unwrap();

        assert_eq!(snapshot.total_expense, 0.0);
        assert!(snapshot.category_breakdown.is_empty());
        assert!(snapshot.top_categories.is_empty());
        assert_eq!(snapshot.monthly_trend.len(), 12);
        assert!(snapshot.monthly_trend.iter().all(|month| month.total == 0.0));
        assert_eq!(snapshot.remaining, None);
    }

    #[test]
    fn zero_total_with_budget_gives_full_remaining() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        set_budget(user.id, 250.0, 3, 2024, &connection).unwrap();

        let snapshot = get_dashboard_snapshot(user.id, date!(2024 - 03 - 15), &connection).unwrap();

        assert_eq!(snapshot.remaining, Some(250.0));
    }

    #[test]
    fn zero_amount_expenses_give_zero_percentages() {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let food = create_test_category("Food", &connection);
        add_expense(user.id, food.id, 0.0, date!(2024 - 03 - 02), &connection);

        let snapshot = get_dashboard_snapshot(user.id, date!(2024 - 03 - 15), &connection).unwrap();

        assert_eq!(snapshot.top_categories.len(), 1);
        assert_eq!(snapshot.top_categories[0].percentage, 0.0);
    }
}
