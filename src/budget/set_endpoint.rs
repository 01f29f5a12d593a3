//! Defines the endpoint for setting the budget for a month.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, amount::parse_amount, auth::UserID, budget::core::set_budget, endpoints,
    timezone::get_local_date,
};

/// The state needed to set a budget.
#[derive(Debug, Clone)]
pub struct SetBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for SetBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for setting a budget.
///
/// A missing month or year falls back to the current one.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub month: Option<u8>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// A route handler for creating or replacing the budget for a month,
/// redirects to the dashboard on success.
pub async fn set_budget_endpoint(
    State(state): State<SetBudgetState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<BudgetForm>,
) -> Response {
    let today = match get_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let amount = parse_amount(&form.amount);
    let month = form.month.unwrap_or_else(|| today.month().into());
    let year = form.year.unwrap_or_else(|| today.year());

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match set_budget(user_id, amount, month, year, &connection) {
        Ok(budget) => {
            tracing::debug!(
                "user {user_id} set budget {} for {}/{} to {}",
                budget.id,
                budget.month,
                budget.year,
                budget.amount
            );

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not set budget: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use time::OffsetDateTime;

    use crate::{
        Error,
        auth::UserID,
        budget::get_budget,
        endpoints,
        test_utils::{assert_hx_redirect, create_test_user, get_test_connection},
    };

    use super::{BudgetForm, SetBudgetState, set_budget_endpoint};

    fn get_state() -> (SetBudgetState, UserID) {
        let connection = get_test_connection();
        let user = create_test_user("alice", &connection);
        let state = SetBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, user.id)
    }

    #[tokio::test]
    async fn can_set_budget() {
        let (state, user_id) = get_state();

        let response = set_budget_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(BudgetForm {
                amount: "1200".to_owned(),
                month: Some(2),
                year: Some(2025),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let budget = get_budget(user_id, 2, 2025, &connection).unwrap();
        assert_eq!(budget.amount, 1200.0);
    }

    #[tokio::test]
    async fn missing_month_and_year_default_to_today() {
        let (state, user_id) = get_state();
        let today = OffsetDateTime::now_utc().date();

        let response = set_budget_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(BudgetForm {
                amount: "not a number".to_owned(),
                month: None,
                year: None,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        let budget = get_budget(user_id, today.month().into(), today.year(), &connection).unwrap();
        assert_eq!(budget.amount, 0.0);
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let (state, user_id) = get_state();

        let response = set_budget_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(BudgetForm {
                amount: "10".to_owned(),
                month: Some(13),
                year: Some(2025),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_budget(user_id, 13, 2025, &connection),
            Err(Error::NotFound)
        );
    }
}
