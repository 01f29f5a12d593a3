//! Pure calculations behind the dashboard snapshot.
//!
//! Provides the twelve month window used for the spending trend, month labels,
//! bucketing of expense amounts by month and the percentages for the top
//! categories.

use serde::Serialize;
use time::{Date, Month};

/// The number of months shown in the spending trend.
pub(crate) const TREND_MONTHS: usize = 12;

/// The number of categories highlighted on the dashboard.
pub(crate) const TOP_CATEGORY_COUNT: usize = 3;

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    pub name: String,
    /// The sum of the user's expenses in the category.
    pub total: f64,
}

/// One of the categories the user spends the most on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategory {
    /// The category name.
    pub name: String,
    /// The sum of the user's expenses in the category.
    pub total: f64,
    /// Share of all spending, rounded to one decimal place.
    pub percentage: f64,
}

/// The total spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The calendar year of the bucket.
    pub year: i32,
    /// The month of the bucket.
    pub month: Month,
    /// Short month name and year, e.g. "Jan 2024".
    pub label: String,
    /// The sum of the user's expenses dated in the month.
    pub total: f64,
}

/// The twelve (year, month) pairs ending at the month of `reference_date`,
/// oldest first.
pub(crate) fn trend_months(reference_date: Date) -> Vec<(i32, Month)> {
    let reference_month = u8::from(reference_date.month()) as i32;

    (0..TREND_MONTHS as i32)
        .rev()
        .map(|months_ago| {
            let mut month = reference_month - months_ago;
            let mut year = reference_date.year();

            while month <= 0 {
                month += 12;
                year -= 1;
            }

            // `month` is always in 1..=12 here.
            let month = Month::January.nth_next((month - 1) as u8);

            (year, month)
        })
        .collect()
}

/// Format a month as its three letter abbreviation and the year, e.g. "Jan 2024".
pub(crate) fn format_month_label(year: i32, month: Month) -> String {
    let name = match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{name} {year}")
}

/// Sum expense amounts into the twelve months ending at `reference_date`.
///
/// Expenses outside of the window are ignored and months without expenses
/// have a total of zero.
pub(crate) fn monthly_trend(reference_date: Date, expenses: &[(Date, f64)]) -> Vec<MonthlyTotal> {
    trend_months(reference_date)
        .into_iter()
        .map(|(year, month)| {
            let total = expenses
                .iter()
                .filter(|(date, _)| date.year() == year && date.month() == month)
                .map(|(_, amount)| amount)
                .sum();

            MonthlyTotal {
                year,
                month,
                label: format_month_label(year, month),
                total,
            }
        })
        .collect()
}

/// The first day of the oldest month in the trend window.
pub(crate) fn trend_start_date(reference_date: Date) -> Option<Date> {
    let (year, month) = *trend_months(reference_date).first()?;

    Date::from_calendar_date(year, month, 1).ok()
}

/// Take the first few categories of `breakdown` and work out their share of
/// `total_expense`.
///
/// `breakdown` must already be sorted from largest to smallest total. If
/// `total_expense` is zero or negative every percentage is zero.
pub(crate) fn top_categories(breakdown: &[CategoryTotal], total_expense: f64) -> Vec<TopCategory> {
    breakdown
        .iter()
        .take(TOP_CATEGORY_COUNT)
        .map(|category| {
            let percentage = if total_expense <= 0.0 {
                0.0
            } else {
                round_to_one_decimal(category.total / total_expense * 100.0)
            };

            TopCategory {
                name: category.name.clone(),
                total: category.total,
                percentage,
            }
        })
        .collect()
}

/// Halves round to even, so 6.25 becomes 6.2.
fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
