use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{LINK_STYLE, base, log_in_register},
};

fn forgot_password_view() -> Markup {
    let content = html! {
        p class="text-justify text-gray-900 dark:text-white"
        {
            "Passwords are reset by the server administrator. On the machine
            running this server, run the "
            code { "reset_password" }
            " program with the path to the database file and your username:"
        }

        pre class="p-2 overflow-x-auto text-sm rounded bg-gray-100 dark:bg-gray-700 dark:text-white"
        {
            "reset_password --db-path expenses.db --username <your username>"
        }

        p class="text-sm font-light text-gray-500 dark:text-gray-400"
        {
            "Remembered it? "
            a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "Log in here" }
        }
    };

    base(
        "Forgot Password",
        &[],
        &log_in_register("Forgot your password?", &content),
    )
}

/// Renders a page describing how the user's password can be reset.
pub async fn get_forgot_password_page() -> Response {
    forgot_password_view().into_response()
}
