//! Ends the user's session.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_auth_cookie, endpoints};

/// Expire the auth cookie and send the client back to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    (invalidate_auth_cookie(jar), Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{Router, routing::get};
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use time::{Duration, OffsetDateTime};

    use crate::{app_state::create_cookie_key, auth::COOKIE_TOKEN, endpoints};

    use super::get_log_out;

    fn test_server() -> TestServer {
        let key = create_cookie_key("log-out-test-secret");
        let app = Router::new()
            .route(endpoints::LOG_OUT, get(get_log_out))
            .with_state(key);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn redirects_to_log_in_page() {
        let response = test_server().get(endpoints::LOG_OUT).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn expires_auth_cookie_even_without_a_session() {
        let response = test_server()
            .get(endpoints::LOG_OUT)
            .add_cookie(Cookie::new(COOKIE_TOKEN, "stale"))
            .await;

        let cookie = response.cookie(COOKIE_TOKEN);
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
