//! Defines the route handler for the page for editing an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{Category, get_all_categories},
    database_id::ExpenseId,
    endpoints::{self, format_endpoint},
    expense::{
        Expense,
        core::get_expense,
        form::{ExpenseFormDefaults, expense_form_fields},
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, dollar_input_styles,
        loading_spinner,
    },
    navigation::NavBar,
};

fn edit_expense_view(expense: &Expense, categories: &[Category]) -> Markup {
    let update_endpoint = format_endpoint(endpoints::EXPENSE, expense.id);
    let nav_bar = NavBar::new(endpoints::EDIT_EXPENSE_VIEW).into_html();
    let spinner = loading_spinner();
    let fields = expense_form_fields(
        &ExpenseFormDefaults {
            title: Some(&expense.title),
            amount: Some(expense.amount),
            date: expense.date,
            category_id: Some(expense.category_id),
        },
        categories,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Expense" }

                (fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Save Changes"
                }

                a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Expense", &[dollar_input_styles()], &content)
}

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for accessing expenses and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing an expense.
///
/// Responds with the 404 page if the expense does not exist or belongs to
/// another user.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(user_id, expense_id, &connection).inspect_err(|error| {
        tracing::debug!("could not get expense {expense_id} for user {user_id}: {error}")
    })?;

    let categories = get_all_categories(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve categories for edit expense page: {error}")
    })?;

    Ok(edit_expense_view(&expense, &categories).into_response())
}
