use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|error| panic!("bad selector {css:?}: {error}"))
}

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&selector("form"))
        .next()
        .expect("page has no form")
}

/// Check that `form` sends its data to `endpoint` via the HTMX `attribute`, e.g. `hx-post`.
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form.value().attr(attribute);

    assert_eq!(
        got,
        Some(endpoint),
        "want form with {attribute}=\"{endpoint}\""
    );
}

#[track_caller]
fn find_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    form.select(&selector(&format!("input[name=\"{name}\"]")))
        .next()
        .unwrap_or_else(|| panic!("form has no input named {name:?}"))
}

/// Check that `form` has a required input called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = find_input(form, name).value();

    assert_eq!(
        input.attr("type"),
        Some(type_),
        "input {name:?} has the wrong type"
    );
    assert!(
        input.attr("required").is_some(),
        "input {name:?} should be required"
    );
}

/// Like [assert_form_input], but also checks the pre-filled value.
#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    assert_form_input(form, name, type_);

    let got = find_input(form, name).value().attr("value").unwrap_or_default();
    assert_eq!(got, value, "input {name:?} has the wrong value");
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    let button = form
        .select(&selector("button"))
        .next()
        .expect("form has no button");

    assert_eq!(button.value().attr("type"), Some("submit"));
}

#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let message = form
        .select(&selector("p.text-red-500"))
        .next()
        .expect("form has no error message")
        .text()
        .collect::<String>();

    assert_eq!(message.trim(), want_error_message);
}
