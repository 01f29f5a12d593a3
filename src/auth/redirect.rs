//! Builds and sanitizes the URLs users are sent back to after logging in.

use axum::{
    extract::Request,
    http::{HeaderMap, Uri},
};

use crate::endpoints;

/// Where a redirect target may come from.
#[derive(Clone, Copy, PartialEq)]
enum Source {
    /// A query parameter or request path. Only relative URLs are accepted.
    Relative,
    /// The `HX-Current-URL` header, which HTMX fills with the absolute URL of
    /// the page. Only the path and query are kept.
    HxCurrentUrl,
}

/// Reduce `raw_url` to a path and query on this site, or `None` if the URL
/// points elsewhere or back at the log-in page.
fn local_target(raw_url: &str, source: Source) -> Option<String> {
    let uri: Uri = raw_url.parse().ok()?;

    if source == Source::Relative && (uri.scheme().is_some() || uri.authority().is_some()) {
        return None;
    }

    let target = uri.path_and_query()?.as_str();
    let is_local = target.starts_with('/') && !target.starts_with("//");
    let is_log_in_page = uri.path() == endpoints::LOG_IN_VIEW;

    (is_local && !is_log_in_page).then(|| target.to_owned())
}

/// Returns `raw_url` if it is a local path other than the log-in page.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    local_target(raw_url, Source::Relative)
}

/// The log-in page URL with a `redirect_url` query pointing back at the
/// page `request` came from. For `/api` routes the page is read from the
/// `HX-Current-URL` header.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let target = if request.uri().path().starts_with("/api") {
        current_page_of_htmx_request(request.headers())?
    } else {
        normalize_redirect_url(request.uri().path_and_query()?.as_str())?
    };

    build_log_in_redirect_url_from_target(&target)
}

pub(super) fn build_log_in_redirect_url_from_target(target: &str) -> Option<String> {
    serde_urlencoded::to_string([("redirect_url", target)])
        .inspect_err(|error| tracing::error!("Could not encode redirect URL {target}: {error}"))
        .ok()
        .map(|query| format!("{}?{query}", endpoints::LOG_IN_VIEW))
}

fn current_page_of_htmx_request(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

    if !header("hx-request").is_some_and(|value| value.eq_ignore_ascii_case("true")) {
        tracing::warn!("API request without an HX-Request header.");
        return None;
    }

    let Some(current_url) = header("hx-current-url") else {
        tracing::warn!("API request without an HX-Current-URL header.");
        return None;
    };

    local_target(current_url, Source::HxCurrentUrl).or_else(|| {
        tracing::warn!("Ignoring HX-Current-URL header value {current_url:?}.");
        None
    })
}
