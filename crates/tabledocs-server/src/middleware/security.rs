//! Security response headers.
//!
//! The site is a same-origin API plus static artifacts, so the policy is
//! narrow: no remote scripts or styles, no embedding, no form targets. Each
//! header gets its own [`SetResponseHeaderLayer`] so the router composes
//! them in one `ServiceBuilder` chain.

use axum::http::HeaderValue;
use axum::http::header;
use tower_http::set_header::SetResponseHeaderLayer;

/// Content-Security-Policy for every response.
///
/// Highlight stylesheets are served as files, so `style-src 'self'` is
/// enough. `ws:`/`wss:` in connect-src keeps the live reload socket
/// working.
const CSP: &str = "default-src 'self'; \
                   script-src 'self'; \
                   style-src 'self'; \
                   img-src 'self'; \
                   connect-src 'self' ws: wss:; \
                   frame-ancestors 'none'; \
                   base-uri 'self'; \
                   form-action 'none'";

pub(crate) fn csp_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP),
    )
}

/// `X-Content-Type-Options: nosniff`. JSON responses must never be sniffed
/// into something executable.
pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    )
}

/// `X-Frame-Options: DENY`, mirroring `frame-ancestors 'none'` for older
/// browsers.
pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_directives() {
        assert!(CSP.contains("default-src 'self'"));
        assert!(CSP.contains("script-src 'self'"));
        assert!(CSP.contains("connect-src 'self' ws: wss:"));
        assert!(CSP.contains("frame-ancestors 'none'"));
        assert!(CSP.contains("form-action 'none'"));
        assert!(!CSP.contains("unsafe-inline"));
    }
}
