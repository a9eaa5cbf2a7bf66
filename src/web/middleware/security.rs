//! Security headers for HTML pages.

use axum::{
    body::Body,
    http::{header, header::HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Content security policy for the generated pages: no scripts, no framing,
/// everything else from this origin.
const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; script-src 'none'; object-src 'none'; frame-ancestors 'none'";

/// Security headers middleware.
///
/// Applied to the generated pages only; uploaded files are served without it
/// so browsers can cache and range-request them.
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );

    // Listings change with every upload
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        );
    }

    response
}
