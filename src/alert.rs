//! Alert messages that are swapped into the page's alert container by HTMX.
//!
//! Forms set `hx-target-error="#alert-container"` so that any error response
//! rendered with [Alert::into_html] is shown to the user without a page reload.

use axum::response::Html;
use maud::{Markup, html};

/// An error message to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An error with a headline and a longer explanation.
    Error { message: String, details: String },
    /// An error with only a headline.
    ErrorSimple { message: String },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, Some(details)),
            Alert::ErrorSimple { message } => (message, None),
        };

        Html(alert_view(&message, details.as_deref()).into_string())
    }
}

fn alert_view(message: &str, details: Option<&str>) -> Markup {
    // Template adapted from https://flowbite.com/docs/components/alerts/
    html! {
        div
            role="alert"
            class="flex items-start p-4 mb-4 text-sm text-red-800 border
                border-red-300 rounded-lg bg-red-50 dark:bg-gray-800
                dark:text-red-400 dark:border-red-800"
        {
            div class="flex-1"
            {
                span class="font-semibold" { (message) }

                @if let Some(details) = details {
                    p class="mt-1" { (details) }
                }
            }

            button
                type="button"
                aria-label="Close"
                class="ms-3 font-bold"
                onclick="document.getElementById('alert-container').classList.add('hidden')"
            {
                "×"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn renders_message_and_details() {
        let html = Alert::Error {
            message: "Could not delete expense".to_owned(),
            details: "The expense could not be found.".to_owned(),
        }
        .into_html();
        let fragment = Html::parse_fragment(&html.0);

        let text = fragment
            .select(&Selector::parse("div[role=alert]").unwrap())
            .next()
            .expect("No alert found")
            .text()
            .collect::<String>();

        assert!(text.contains("Could not delete expense"));
        assert!(text.contains("The expense could not be found."));
    }

    #[test]
    fn simple_alert_has_no_details() {
        let html = Alert::ErrorSimple {
            message: "Oops".to_owned(),
        }
        .into_html();
        let fragment = Html::parse_fragment(&html.0);

        let details = fragment
            .select(&Selector::parse("p").unwrap())
            .collect::<Vec<_>>();

        assert!(details.is_empty(), "want no details, got {}", details.len());
    }
}
