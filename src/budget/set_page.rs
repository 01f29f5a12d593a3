//! Defines the page for setting the budget for a month.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, Month};

use crate::{
    AppState, Error,
    auth::UserID,
    budget::core::{Budget, get_budget},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base, dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    timezone::get_local_date,
};

fn set_budget_view(today: Date, current_budget: Option<&Budget>) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGET_VIEW).into_html();
    let spinner = loading_spinner();
    let amount_str = current_budget.map(|budget| format!("{:.2}", budget.amount));
    let current_month = u8::from(today.month());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::BUDGET_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Set Monthly Budget" }

                div
                {
                    label
                        for="amount"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Amount"
                    }

                    div class="input-wrapper w-full"
                    {
                        input
                            name="amount"
                            id="amount"
                            type="number"
                            step="0.01"
                            min="0"
                            placeholder="0.00"
                            required
                            autofocus
                            value=[amount_str.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label
                        for="month"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Month"
                    }

                    select
                        name="month"
                        id="month"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for month_number in 1..=12u8 {
                            @let month_name = Month::try_from(month_number)
                                .map(|month| month.to_string())
                                .unwrap_or_else(|_| month_number.to_string());

                            @if month_number == current_month {
                                option value=(month_number) selected { (month_name) }
                            } @else {
                                option value=(month_number) { (month_name) }
                            }
                        }
                    }
                }

                div
                {
                    label
                        for="year"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Year"
                    }

                    input
                        name="year"
                        id="year"
                        type="number"
                        step="1"
                        required
                        value=(today.year())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Save Budget"
                }

                a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Budget", &[dollar_input_styles()], &content)
}

/// The state needed for the set budget page.
#[derive(Debug, Clone)]
pub struct SetBudgetPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading the current budget.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SetBudgetPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for setting a budget, pre-filled with the budget for the
/// current month if one has been set.
pub async fn get_set_budget_page(
    State(state): State<SetBudgetPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let current_budget = match get_budget(user_id, today.month().into(), today.year(), &connection)
    {
        Ok(budget) => Some(budget),
        Err(Error::NotFound) => None,
        Err(error) => {
            tracing::error!("Failed to retrieve budget for user {user_id}: {error}");
            return Err(error);
        }
    };

    Ok(set_budget_view(today, current_budget.as_ref()).into_response())
}
