//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{User, UserID, get_user_by_id},
    category::{Category, get_all_categories},
    dashboard::{
        cards::{summary_cards_view, top_categories_view},
        charts::{
            DashboardChart, category_breakdown_chart, charts_script, charts_view,
            monthly_trend_chart,
        },
        snapshot::{DashboardSnapshot, get_dashboard_snapshot},
        tables::expenses_table,
    },
    endpoints,
    expense::{Expense, get_expenses},
    html::{HeadElement, base},
    navigation::NavBar,
    timezone::get_local_date,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading expenses and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    user: User,
    snapshot: DashboardSnapshot,
    expenses: Vec<Expense>,
    categories: Vec<Category>,
}

/// Display a page with an overview of the user's spending.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let data = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        build_dashboard_data(user_id, today, &connection)
            .inspect_err(|error| tracing::error!("could not build dashboard data: {error}"))?
    };

    Ok(dashboard_view(&data).into_response())
}

fn build_dashboard_data(
    user_id: UserID,
    today: time::Date,
    connection: &Connection,
) -> Result<DashboardData, Error> {
    Ok(DashboardData {
        user: get_user_by_id(user_id, connection)?,
        snapshot: get_dashboard_snapshot(user_id, today, connection)?,
        expenses: get_expenses(user_id, connection)?,
        categories: get_all_categories(connection)?,
    })
}

/// Creates the dashboard charts from the snapshot.
///
/// The chart options are serialized to JSON for ECharts consumption.
fn build_dashboard_charts(snapshot: &DashboardSnapshot) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "category-breakdown-chart",
            options: category_breakdown_chart(&snapshot.category_breakdown).to_string(),
        },
        DashboardChart {
            id: "monthly-trend-chart",
            options: monthly_trend_chart(&snapshot.monthly_trend).to_string(),
        },
    ]
}

fn dashboard_view(data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let charts = build_dashboard_charts(&data.snapshot);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h2 class="w-full text-2xl font-bold mb-4"
            {
                "Welcome back, " (data.user.username)
            }

            (summary_cards_view(&data.snapshot))

            (top_categories_view(&data.snapshot.top_categories))

            (charts_view(&charts))

            (expenses_table(&data.expenses, &data.categories))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
