//! The registration page for creating a new user account.
//!
//! Registration checks its rules one at a time and reports only the first
//! rule that fails, re-rendering the form with the username and email the
//! user already typed in.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        PasswordHash, ValidatedPassword,
        password::{PASSWORD_MIN_LENGTH, is_entirely_numeric, is_too_short},
        set_auth_cookie,
        user::{create_user, email_exists, username_exists},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FormInput, LINK_STYLE, base, form_error, form_input,
        loading_spinner, log_in_register,
    },
    internal_server_error::get_internal_server_error_redirect,
    timezone::get_local_offset,
};

/// The reasons a registration can be rejected, in the order they are checked.
///
/// The display text is the message shown to the user.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RegistrationError {
    /// At least one of the form fields was left blank.
    #[error("All fields are required.")]
    MissingFields,

    /// Another user already has the username.
    #[error("Username already taken. Please choose another.")]
    UsernameTaken,

    /// Another user already registered with the email address.
    #[error("Email already registered.")]
    EmailTaken,

    /// The password has too few characters.
    #[error("Password must be at least {} characters long.", PASSWORD_MIN_LENGTH)]
    PasswordTooShort,

    /// The password and its confirmation differ.
    #[error("Passwords do not match.")]
    PasswordMismatch,

    /// The password only has digits.
    #[error("Password cannot be entirely numeric.")]
    PasswordEntirelyNumeric,

    /// Something went wrong that the user cannot fix.
    #[error(transparent)]
    Internal(#[from] Error),
}

/// The data submitted with the registration form.
///
/// Missing fields deserialize to empty strings so that they are reported
/// with the same message as blank fields.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The name the user will log in with.
    #[serde(default)]
    pub username: String,
    /// The user's email address.
    #[serde(default)]
    pub email: String,
    /// The new password.
    #[serde(default)]
    pub password: String,
    /// The new password typed a second time.
    #[serde(default)]
    pub confirm_password: String,
}

/// Check `form` against the registration rules and return the validated
/// password if every rule passes.
///
/// # Errors
///
/// Returns the [RegistrationError] for the first rule that fails.
pub fn validate_registration(
    form: &RegisterForm,
    connection: &Connection,
) -> Result<ValidatedPassword, RegistrationError> {
    let username = form.username.trim();
    let email = form.email.trim();

    if username.is_empty()
        || email.is_empty()
        || form.password.is_empty()
        || form.confirm_password.is_empty()
    {
        return Err(RegistrationError::MissingFields);
    }

    if username_exists(username, connection)? {
        return Err(RegistrationError::UsernameTaken);
    }

    if email_exists(email, connection)? {
        return Err(RegistrationError::EmailTaken);
    }

    if is_too_short(&form.password) {
        return Err(RegistrationError::PasswordTooShort);
    }

    if form.password != form.confirm_password {
        return Err(RegistrationError::PasswordMismatch);
    }

    if is_entirely_numeric(&form.password) {
        return Err(RegistrationError::PasswordEntirelyNumeric);
    }

    Ok(ValidatedPassword::new_unchecked(&form.password))
}

fn registration_form(username: &str, email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (form_input(&FormInput {
                name: "username",
                label: "Username",
                type_: "text",
                value: username,
                placeholder: "Your username",
                autofocus: true,
            }))

            (form_input(&FormInput {
                name: "email",
                label: "Email",
                type_: "email",
                value: email,
                placeholder: "name@example.com",
                autofocus: false,
            }))

            (form_input(&FormInput {
                name: "password",
                label: "Password",
                type_: "password",
                value: "",
                placeholder: "••••••••",
                autofocus: false,
            }))

            (form_input(&FormInput {
                name: "confirm_password",
                label: "Confirm Password",
                type_: "password",
                value: "",
                placeholder: "••••••••",
                autofocus: false,
            }))

            (form_error(error_message))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", "", None);
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for storing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a user from the registration form, log them in and redirect them
/// to the dashboard.
///
/// If a registration rule fails the form is returned with the error message.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let username = form.username.trim();
    let email = form.email.trim();
    let render_error = |error: RegistrationError| match error {
        RegistrationError::Internal(error) => {
            tracing::error!("An unhandled error occurred while registering a user: {error}");
            get_internal_server_error_redirect()
        }
        error => registration_form(username, email, Some(&error.to_string())).into_response(),
    };

    let validated_password = {
        let Ok(connection) = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        else {
            return render_error(RegistrationError::Internal(Error::DatabaseLockError));
        };

        match validate_registration(&form, &connection) {
            Ok(password) => password,
            Err(error) => return render_error(error),
        }
    };

    // Hashing is slow, so the lock is released until the user is inserted.
    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => return render_error(error.into()),
    };

    let Ok(connection) = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
    else {
        return render_error(RegistrationError::Internal(Error::DatabaseLockError));
    };

    let created = create_user(username, email, password_hash, &connection);
    drop(connection);

    let user = match created {
        Ok(user) => user,
        Err(Error::DuplicateUsername(_)) => return render_error(RegistrationError::UsernameTaken),
        Err(Error::DuplicateEmail(_)) => return render_error(RegistrationError::EmailTaken),
        Err(error) => return render_error(error.into()),
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    tracing::info!("Registered user {} ({})", user.id, user.username);

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => render_error(error.into()),
    }
}
