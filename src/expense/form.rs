use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    amount::parse_amount,
    category::{Category, CategoryId},
    expense::NewExpense,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The values to pre-fill the expense form with.
pub struct ExpenseFormDefaults<'a> {
    pub title: Option<&'a str>,
    pub amount: Option<f64>,
    pub date: Date,
    pub category_id: Option<CategoryId>,
}

/// The form data for creating or editing an expense.
///
/// Must be used with axum_extra's Form since that parses an empty string as
/// None instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    /// A short description of the expense.
    #[serde(default)]
    pub title: String,
    /// The raw amount text, parsed leniently with [parse_amount].
    #[serde(default)]
    pub amount: String,
    /// When the expense happened, defaults to today if omitted.
    #[serde(default)]
    pub date: Option<Date>,
    /// The category the expense belongs to.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

impl ExpenseForm {
    /// The amount entered in the form, or zero if it is not a number.
    pub fn amount(&self) -> f64 {
        parse_amount(&self.amount)
    }

    /// Convert the form into the fields of an expense.
    ///
    /// A missing date is replaced with `today`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no category was chosen.
    pub fn into_new_expense(self, today: Date) -> Result<NewExpense, Error> {
        let amount = self.amount();
        let Some(category_id) = self.category_id else {
            tracing::debug!("expense form submitted without a category");
            return Err(Error::NotFound);
        };

        Ok(NewExpense {
            title: self.title.trim().to_owned(),
            amount,
            date: self.date.unwrap_or(today),
            category_id,
        })
    }
}

pub fn expense_form_fields(defaults: &ExpenseFormDefaults<'_>, categories: &[Category]) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label
                for="title"
                class=(FORM_LABEL_STYLE)
            {
                "Title"
            }

            input
                name="title"
                id="title"
                type="text"
                placeholder="What did you buy?"
                value=[defaults.title]
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

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
                    placeholder="0.00"
                    min="0"
                    required
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category_id"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category_id"
                id="category_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a category" }

                @for category in categories {
                    @if Some(category.id) == defaults.category_id {
                        option value=(category.id) selected { (category.name) }
                    } @else {
                        option value=(category.id) { (category.name) }
                    }
                }
            }
        }
    }
}
