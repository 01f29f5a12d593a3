//! Card components for the headline figures of the dashboard.
//!
//! Provides cards showing the total spent, the budget for the current month,
//! what is left of the budget and the categories with the most spending.

use maud::{Markup, html};

use crate::{
    dashboard::{aggregation::TopCategory, snapshot::DashboardSnapshot},
    endpoints,
    html::{LINK_STYLE, format_currency},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col justify-between";
const CARD_LABEL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold";

/// Renders the total, budget and remaining budget cards.
pub(super) fn summary_cards_view(snapshot: &DashboardSnapshot) -> Markup {
    html! {
        section id="summary" class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
            {
                div class=(CARD_STYLE)
                {
                    span class=(CARD_LABEL_STYLE) { "Total Expenses" }
                    span id="total-expense" class=(CARD_VALUE_STYLE)
                    {
                        (format_currency(snapshot.total_expense))
                    }
                }

                div class=(CARD_STYLE)
                {
                    span class=(CARD_LABEL_STYLE) { "Budget This Month" }

                    @match &snapshot.current_budget {
                        Some(budget) => {
                            span id="current-budget" class=(CARD_VALUE_STYLE)
                            {
                                (format_currency(budget.amount))
                            }
                        }
                        None => {
                            span id="current-budget" class="text-base"
                            {
                                "No budget set. "
                                a href=(endpoints::BUDGET_VIEW) class=(LINK_STYLE) { "Set one" }
                            }
                        }
                    }
                }

                div class=(CARD_STYLE)
                {
                    span class=(CARD_LABEL_STYLE) { "Remaining" }

                    @match snapshot.remaining {
                        Some(remaining) => {
                            span
                                id="remaining"
                                class={(CARD_VALUE_STYLE) " " (remaining_color_class(remaining))}
                            {
                                (format_currency(remaining))
                            }
                        }
                        None => {
                            span id="remaining" class=(CARD_VALUE_STYLE) { "-" }
                        }
                    }
                }
            }
        }
    }
}

fn remaining_color_class(remaining: f64) -> &'static str {
    if remaining < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    }
}

/// Renders a card for each of the top categories.
///
/// Renders nothing when the user has no expenses.
pub(super) fn top_categories_view(top_categories: &[TopCategory]) -> Markup {
    if top_categories.is_empty() {
        return html! {};
    }

    html! {
        section id="top-categories" class="w-full mx-auto mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Top Categories" }

            div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
            {
                @for category in top_categories {
                    div
                        class=(CARD_STYLE)
                        aria-label=(format!(
                            "{}: {}, {:.1}% of all spending",
                            category.name,
                            format_currency(category.total),
                            category.percentage
                        ))
                    {
                        h4 class="text-lg font-semibold truncate" title=(category.name)
                        {
                            (category.name)
                        }
                        span class=(CARD_VALUE_STYLE) { (format_currency(category.total)) }
                        span class=(CARD_LABEL_STYLE)
                        {
                            (format!("{:.1}%", category.percentage)) " of all spending"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        auth::UserID,
        budget::Budget,
        dashboard::{aggregation::TopCategory, snapshot::DashboardSnapshot},
    };

    use super::{summary_cards_view, top_categories_view};

    fn snapshot(current_budget: Option<Budget>, remaining: Option<f64>) -> DashboardSnapshot {
        DashboardSnapshot {
            total_expense: 180.0,
            current_budget,
            remaining,
            category_breakdown: vec![],
            top_categories: vec![],
            monthly_trend: vec![],
        }
    }

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("no element matching {selector}"))
            .text()
            .collect::<String>()
    }

    #[test]
    fn summary_without_budget_shows_dash_for_remaining() {
        let html = Html::parse_fragment(&summary_cards_view(&snapshot(None, None)).into_string());

        assert_eq!(text_of(&html, "#total-expense").trim(), "$180.00");
        assert_eq!(text_of(&html, "#remaining").trim(), "-");
        assert!(text_of(&html, "#current-budget").contains("No budget set."));
    }

    #[test]
    fn summary_with_budget_shows_remaining() {
        let budget = Budget {
            id: 1,
            amount: 150.0,
            month: 1,
            year: 2024,
            user_id: UserID::new(1),
        };

        let html = Html::parse_fragment(
            &summary_cards_view(&snapshot(Some(budget), Some(-30.0))).into_string(),
        );

        assert_eq!(text_of(&html, "#current-budget").trim(), "$150.00");
        assert_eq!(text_of(&html, "#remaining").trim(), "-$30.00");
    }

    #[test]
    fn top_categories_show_percentages() {
        let html = Html::parse_fragment(
            &top_categories_view(&[TopCategory {
                name: "Food".to_owned(),
                total: 150.0,
                percentage: 83.3,
            }])
            .into_string(),
        );

        let text = text_of(&html, "#top-categories");
        assert!(text.contains("Food"));
        assert!(text.contains("83.3%"));
    }

    #[test]
    fn no_top_categories_renders_nothing() {
        assert_eq!(top_categories_view(&[]).into_string(), "");
    }
}
