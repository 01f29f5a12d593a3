//! Middleware that resolves the logged in user from the auth cookie.
//!
//! Requests without a valid session are redirected to the log-in page with a
//! `redirect_url` query so the user lands back where they started.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::{
        DEFAULT_COOKIE_DURATION, UserID,
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::{build_log_in_redirect_url, build_log_in_redirect_url_from_target},
    },
    endpoints,
    timezone::get_local_offset,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// How to send an unauthenticated client to the log-in page.
#[derive(Clone, Copy)]
enum LogInRedirect {
    /// A plain 303 redirect for full page loads.
    Page,
    /// An `HX-Redirect` header, since HTMX ignores redirects on its requests.
    Htmx,
}

impl LogInRedirect {
    fn to(self, url: &str) -> Response {
        match self {
            LogInRedirect::Page => Redirect::to(url).into_response(),
            LogInRedirect::Htmx => (HxRedirect(url.to_owned()), StatusCode::OK).into_response(),
        }
    }
}

/// Checks the auth cookie on page requests.
///
/// Valid sessions get their [UserID] added to the request extensions, so
/// handlers can take `Extension(user_id): Extension<UserID>`. Anyone else is
/// redirected to the log-in page.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard(state, request, next, LogInRedirect::Page).await
}

/// Same as [auth_guard] for the `/api` routes called by HTMX.
///
/// The redirect is sent as an `HX-Redirect` header pointing back at the page
/// given in `HX-Current-URL`.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, LogInRedirect::Htmx).await
}

async fn guard(
    state: AuthState,
    request: Request,
    next: Next,
    log_in_redirect: LogInRedirect,
) -> Response {
    let log_in_url = log_in_url_for(&request);

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!(
            "Invalid timezone \"{}\", cannot check the session.",
            state.local_timezone
        );
        return log_in_redirect.to(&log_in_url);
    };

    let (mut parts, body) = request.into_parts();
    let Some((user_id, jar)) = resolve_session(&mut parts, &state).await else {
        return log_in_redirect.to(&log_in_url);
    };

    parts.extensions.insert(user_id);
    let response = next.run(Request::from_parts(parts, body)).await;

    let jar =
        extend_auth_cookie_duration_if_needed(jar.clone(), DEFAULT_COOKIE_DURATION, local_offset)
            .unwrap_or_else(|error| {
                tracing::error!("Could not extend the session for user {user_id}: {error}");
                jar
            });

    with_cookies_from(response, jar)
}

/// Where to send the client to log in, remembering the page they wanted.
fn log_in_url_for(request: &Request) -> String {
    build_log_in_redirect_url(request).unwrap_or_else(|| {
        tracing::warn!(
            "No usable return address for {}, returning to the dashboard after log-in.",
            request.uri().path()
        );

        build_log_in_redirect_url_from_target(endpoints::DASHBOARD_VIEW)
            .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned())
    })
}

async fn resolve_session(
    parts: &mut Parts,
    state: &AuthState,
) -> Option<(UserID, PrivateCookieJar)> {
    let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
        .await
        .inspect_err(|error| tracing::error!("Could not read the cookie jar: {error:?}"))
        .ok()?;

    let token = get_token_from_cookies(&jar)
        .inspect_err(|error| tracing::debug!("Rejected auth cookie: {error}"))
        .ok()?;

    Some((token.user_id, jar))
}

/// Copy the `Set-Cookie` headers of `jar` onto `response`.
fn with_cookies_from(response: Response, jar: PrivateCookieJar) -> Response {
    let (mut parts, body) = response.into_parts();
    let jar_response = jar.into_response();

    append_set_cookie_headers(&mut parts.headers, jar_response.headers());

    Response::from_parts(parts, body)
}

fn append_set_cookie_headers(target: &mut HeaderMap, source: &HeaderMap) {
    for value in source.get_all(SET_COOKIE) {
        target.append(SET_COOKIE, value.to_owned());
    }
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::State,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::{TestResponse, TestServer};
    use sha2::Digest;
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        Error,
        auth::{
            AuthState, COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, UserID, auth_guard, auth_guard_hx,
            set_auth_cookie,
        },
        endpoints,
    };

    const LOG_IN_ROUTE: &str = "/test/log_in";
    const PAGE_ROUTE: &str = "/expenses/new";
    const API_ROUTE: &str = "/api/expenses";

    async fn whoami(Extension(user_id): Extension<UserID>) -> String {
        user_id.to_string()
    }

    async fn log_in_as_user_7(
        State(state): State<AuthState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, UserID::new(7), state.cookie_duration, UtcOffset::UTC)
    }

    fn test_state(cookie_duration: Duration) -> AuthState {
        AuthState {
            cookie_key: Key::from(&sha2::Sha512::digest("auth-guard-test-secret")),
            cookie_duration,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    /// A server with one page route behind [auth_guard] and one API route behind [auth_guard_hx].
    fn test_server(cookie_duration: Duration) -> TestServer {
        let state = test_state(cookie_duration);

        let pages = Router::new()
            .route(PAGE_ROUTE, get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));
        let api = Router::new()
            .route(API_ROUTE, get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx));

        let app = pages
            .merge(api)
            .route(LOG_IN_ROUTE, post(log_in_as_user_7))
            .with_state(state);

        TestServer::new(app)
    }

    async fn auth_cookie(server: &TestServer) -> Cookie<'static> {
        let response = server.post(LOG_IN_ROUTE).await;
        response.assert_status_ok();
        response.cookie(COOKIE_TOKEN)
    }

    fn log_in_url(redirect_url: &str) -> String {
        format!(
            "{}?{}",
            endpoints::LOG_IN_VIEW,
            serde_urlencoded::to_string([("redirect_url", redirect_url)]).unwrap()
        )
    }

    #[track_caller]
    fn assert_redirected_to_log_in(response: &TestResponse, redirect_url: &str) {
        response.assert_status_see_other();
        assert_eq!(response.header("location"), log_in_url(redirect_url));
    }

    #[track_caller]
    fn assert_close_to(got: OffsetDateTime, want: OffsetDateTime) {
        assert!(
            (got - want).abs() < Duration::seconds(2),
            "got {got:?}, want {want:?}"
        );
    }

    #[tokio::test]
    async fn valid_cookie_passes_user_id_to_handler() {
        let server = test_server(DEFAULT_COOKIE_DURATION);
        let cookie = auth_cookie(&server).await;

        let response = server.get(PAGE_ROUTE).add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_text("7");
    }

    #[tokio::test]
    async fn missing_cookie_redirects_to_log_in() {
        let server = test_server(DEFAULT_COOKIE_DURATION);

        let response = server.get(PAGE_ROUTE).await;

        assert_redirected_to_log_in(&response, PAGE_ROUTE);
    }

    #[tokio::test]
    async fn tampered_cookie_redirects_to_log_in() {
        let server = test_server(DEFAULT_COOKIE_DURATION);

        let response = server
            .get(PAGE_ROUTE)
            .add_cookie(Cookie::new(COOKIE_TOKEN, "not-a-real-token"))
            .await;

        assert_redirected_to_log_in(&response, PAGE_ROUTE);
    }

    #[tokio::test]
    async fn expired_cookie_redirects_to_log_in() {
        let server = test_server(Duration::seconds(-5));
        let cookie = auth_cookie(&server).await;

        let response = server.get(PAGE_ROUTE).add_cookie(cookie).await;

        assert_redirected_to_log_in(&response, PAGE_ROUTE);
    }

    #[tokio::test]
    async fn short_session_is_extended_to_default_duration() {
        let server = test_server(Duration::seconds(5));
        let cookie = auth_cookie(&server).await;
        let logged_in_at = OffsetDateTime::now_utc();

        let response = server.get(PAGE_ROUTE).add_cookie(cookie).await;

        let cookie = response.cookie(COOKIE_TOKEN);
        assert_close_to(
            cookie.expires_datetime().unwrap(),
            logged_in_at + DEFAULT_COOKIE_DURATION,
        );
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn api_route_redirects_back_to_current_page() {
        let server = test_server(DEFAULT_COOKIE_DURATION);
        let current_url = "/expenses/4/edit";

        let response = server
            .get(API_ROUTE)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", current_url)
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), log_in_url(current_url));
    }

    #[tokio::test]
    async fn api_route_without_htmx_headers_returns_to_dashboard() {
        let server = test_server(DEFAULT_COOKIE_DURATION);

        let response = server.get(API_ROUTE).await;

        assert_eq!(
            response.header("hx-redirect"),
            log_in_url(endpoints::DASHBOARD_VIEW)
        );
    }
}
