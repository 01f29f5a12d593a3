//! Defines the endpoint for recording a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    expense::{core::create_expense, form::ExpenseForm},
    timezone::get_local_date,
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for recording a new expense, redirects to the dashboard on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let today = match get_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let expense = match form.into_new_expense(today) {
        Ok(expense) => expense,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_expense(user_id, expense, &connection) {
        Ok(expense) => {
            tracing::debug!("user {user_id} created expense {}", expense.id);
        }
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            return error.into_alert_response();
        }
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{
        auth::UserID,
        category::CategoryId,
        endpoints,
        expense::{core::get_expenses, form::ExpenseForm},
        test_utils::{
            assert_hx_redirect, create_test_category, create_test_user, get_test_connection,
        },
    };

    use super::{CreateExpenseState, create_expense_endpoint};

    fn form(amount: &str, date: Option<Date>, category_id: Option<CategoryId>) -> ExpenseForm {
        ExpenseForm {
            title: "Groceries".to_owned(),
            amount: amount.to_owned(),
            date,
            category_id,
        }
    }

    fn get_state() -> (CreateExpenseState, UserID, CategoryId) {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let category = create_test_category("Food", &connection);
        let state = CreateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, user.id, category.id)
    }

    #[tokio::test]
    async fn can_create_expense() {
        let (state, user_id, category_id) = get_state();

        let response = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(form("42.10", Some(date!(2025 - 01 - 05)), Some(category_id))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let expenses = get_expenses(user_id, &connection).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].title, "Groceries");
        assert_eq!(expenses[0].amount, 42.10);
        assert_eq!(expenses[0].date, date!(2025 - 01 - 05));
        assert_eq!(expenses[0].user_id, user_id);
    }

    #[tokio::test]
    async fn invalid_amount_is_saved_as_zero() {
        let (state, user_id, category_id) = get_state();

        let response = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(form("twelve", None, Some(category_id))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        let expenses = get_expenses(user_id, &connection).unwrap();
        assert_eq!(expenses[0].amount, 0.0);
        assert_eq!(expenses[0].date, OffsetDateTime::now_utc().date());
    }

    #[tokio::test]
    async fn missing_category_returns_not_found() {
        let (state, user_id, _) = get_state();

        let response = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(form("1.00", None, None)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_expenses(user_id, &connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_category_returns_not_found() {
        let (state, user_id, category_id) = get_state();

        let response = create_expense_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(form("1.00", None, Some(category_id + 100))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_expenses(user_id, &connection).unwrap().is_empty());
    }
}
