//! HTTP request handlers.

pub(crate) mod examples;
pub(crate) mod navigation;
pub(crate) mod profiles;

/// Convert internal path (without leading slash) to URL path (with leading slash).
///
/// Wildcard captures arrive without the leading slash (e.g. "examples/basic"),
/// but registry pathnames carry one (e.g. "/examples/basic").
pub(crate) fn to_url_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{path}")
    }
}
