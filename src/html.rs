//! Shared page layout, styles and formatting helpers for the HTML views.
use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

use crate::endpoints;

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Category badge style
pub const CATEGORY_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-blue-800 bg-blue-100 rounded-full \
    dark:bg-blue-900 dark:text-blue-300";

/// Extra elements to add to the `<head>` of a page.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    /// CSS rules.
    Style(PreEscaped<String>),
}

/// Styles needed on every page for HTMX loading indicators and chart tooltips.
const BASE_STYLES: &str = r#"
    #indicator.htmx-indicator { display: none; }
    #indicator.htmx-request .htmx-indicator { display: inline; }
    #indicator.htmx-request.htmx-indicator { display: inline; }
    .echarts-tooltip { z-index: 30 !important; }
"#;

fn page_head(title: &str, head_elements: &[HeadElement]) -> Markup {
    html! {
        head
        {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { (title) " | Expense Tracker" }
            link rel="icon" type="image/png" href="/static/favicon-32x32.png" sizes="32x32";
            link href="/static/main.css" rel="stylesheet";

            script src="/static/htmx-2.0.8-min.js" {}
            script src="/static/htmx-ext-response-targets-2.0.4.js" {}

            style { (PreEscaped(BASE_STYLES)) }

            @for element in head_elements {
                @match element {
                    HeadElement::ScriptSource(text) => script { (text) }
                    HeadElement::ScriptLink(path) => script src=(path) {}
                    HeadElement::Style(text) => style { (text) }
                }
            }
        }
    }
}

/// The full HTML document around a page's `content`.
///
/// Every page gets an `#alert-container` that HTMX error responses are
/// swapped into.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            (page_head(title, head_elements))

            body
                hx-ext="response-targets"
                class="min-h-screen bg-gray-50 dark:bg-gray-900 pb-20 lg:pb-0"
            {
                (content)

                div
                    id="alert-container"
                    class="hidden fixed bottom-4 left-1/2 -translate-x-1/2 z-50 w-full max-w-md px-4"
                {}
            }
        }
    }
}

/// A full page for errors such as 404 and 500.
///
/// `code` is shown as the headline, followed by what went wrong and how to fix it.
pub fn error_view(title: &str, code: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        main class="flex flex-col items-center justify-center min-h-screen px-4 text-center"
        {
            h1 class="mb-4 text-7xl lg:text-9xl font-extrabold text-blue-600 dark:text-blue-500"
            {
                (code)
            }

            p class="mb-4 text-3xl font-bold text-gray-900 dark:text-white"
            {
                (description)
            }

            p class="mb-6 text-xl text-gray-700 dark:text-gray-300"
            {
                (fix)
            }

            a href=(endpoints::ROOT) class=(BUTTON_PRIMARY_STYLE)
            {
                "Back to the dashboard"
            }
        }
    );

    base(title, &[], &content)
}

/// The centred card used by the log-in and registration pages.
pub fn log_in_register(form_title: &str, form: &Markup) -> Markup {
    html! {
        main class="flex flex-col items-center justify-center min-h-screen px-6 py-8"
        {
            p class="mb-6 text-2xl font-semibold text-gray-900 dark:text-white"
            {
                "Expense Tracker"
            }

            div class="w-full sm:max-w-md p-6 sm:p-8 space-y-4 bg-white dark:bg-gray-800 rounded-lg shadow"
            {
                h1 class="text-xl md:text-2xl font-bold text-gray-900 dark:text-white"
                {
                    (form_title)
                }

                (form)
            }
        }
    }
}

/// A labelled `<input>` for the log-in and registration forms.
pub struct FormInput<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub type_: &'a str,
    pub value: &'a str,
    pub placeholder: &'a str,
    pub autofocus: bool,
}

pub fn form_input(input: &FormInput<'_>) -> Markup {
    html! {
        div
        {
            label
                for=(input.name)
                class=(FORM_LABEL_STYLE)
            {
                (input.label)
            }

            input
                type=(input.type_)
                name=(input.name)
                id=(input.name)
                placeholder=(input.placeholder)
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus[input.autofocus]
                value=(input.value);
        }
    }
}

/// The error message shown at the bottom of a form.
pub fn form_error(error_message: Option<&str>) -> Markup {
    html! {
        @if let Some(error_message) = error_message
        {
            p class="text-red-500 text-base" { (error_message) }
        }
    }
}

/// A small spinning circle for buttons while a request is in flight.
pub fn loading_spinner() -> Markup {
    html! {
        span
            aria-hidden="true"
            role="status"
            class="inline-block w-4 h-4 me-2 align-middle rounded-full border-2
                border-white border-t-transparent animate-spin"
        {}
    }
}

/// Returns the CSS styles for adding a dollar sign prefix to number inputs.
/// Used for currency input fields across multiple forms.
pub fn dollar_input_styles() -> HeadElement {
    HeadElement::Style(PreEscaped(
        r#"
        .input-wrapper {
            position: relative;
            display: inline-block;
        }
        .input-wrapper input[type="number"] {
            padding-left: 1.4rem;
        }
        .input-wrapper::before {
            content: '$';
            position: absolute;
            left: 0.6rem;
            top: 50%;
            transform: translateY(-50%);
            pointer-events: none;
        }
        "#
        .to_owned(),
    ))
}

/// Format `number` as dollars and cents, e.g. "$1,234.50" or "-$3.00".
pub fn format_currency(number: f64) -> String {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    let magnitude = (number.abs() * 100.0).round() / 100.0;
    let sign = if number < 0.0 && magnitude != 0.0 { "-" } else { "" };

    let dollars = match FORMATTER.get_or_init(dollar_formatter) {
        // numfmt drops trailing zeros and renders zero as "0", so pad to cents here.
        Some(formatter) if magnitude != 0.0 => pad_cents(formatter.fmt_string(magnitude)),
        _ => format!("${magnitude:.2}"),
    };

    format!("{sign}{dollars}")
}

fn dollar_formatter() -> Option<Formatter> {
    Formatter::currency("$")
        .inspect_err(|error| tracing::error!("could not create currency formatter: {error:?}"))
        .ok()
        .map(|formatter| formatter.precision(Precision::Decimals(2)))
}

fn pad_cents(mut formatted: String) -> String {
    match formatted.find('.') {
        None => formatted.push_str(".00"),
        Some(point) => {
            let decimals = formatted.len() - point - 1;
            formatted.extend(std::iter::repeat_n('0', 2usize.saturating_sub(decimals)));
        }
    }

    formatted
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}
