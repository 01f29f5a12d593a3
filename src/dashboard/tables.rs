//! The table listing a user's expenses on the dashboard.

use std::collections::HashMap;

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    category::{Category, CategoryId},
    endpoints::{self, format_endpoint},
    expense::Expense,
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, link,
    },
};

/// The max number of graphemes of a title to show before truncating with ellipses.
const MAX_TITLE_GRAPHEMES: usize = 32;

/// Renders every expense, newest first, with links to edit or delete each one.
pub(super) fn expenses_table(expenses: &[Expense], categories: &[Category]) -> Markup {
    let category_names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_ref()))
        .collect();

    html! {
        section id="expenses" class="w-full mx-auto mb-8"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Expenses" }
                a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE) { "Add expense" }
            }

            @if expenses.is_empty() {
                p class="text-gray-600 dark:text-gray-400"
                {
                    "No expenses recorded yet. Start by "
                    (link(endpoints::NEW_EXPENSE_VIEW, "adding one"))
                    "."
                }
            } @else {
                div class="overflow-x-auto rounded-lg shadow"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for expense in expenses {
                                (expense_row(
                                    expense,
                                    category_names.get(&expense.category_id).copied(),
                                ))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn expense_row(expense: &Expense, category_name: Option<&str>) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
    let delete_url = format_endpoint(endpoints::EXPENSE, expense.id);
    let (title, full_title) = format_title(&expense.title);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (expense.date) }
            td
                class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                title=[full_title]
            {
                (title)
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (category_name.unwrap_or("Unknown")) }
            }
            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(expense.amount)) }
            td class={(TABLE_CELL_STYLE) " space-x-4"}
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                button
                    type="button"
                    hx-delete=(delete_url)
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn format_title(title: &str) -> (String, Option<&str>) {
    if title.graphemes(true).count() <= MAX_TITLE_GRAPHEMES {
        return (title.to_owned(), None);
    }

    let truncated: String = title
        .graphemes(true)
        .take(MAX_TITLE_GRAPHEMES - 3)
        .collect();

    (truncated + "...", Some(title))
}
