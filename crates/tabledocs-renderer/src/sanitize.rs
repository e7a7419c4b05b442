//! Allow-list HTML sanitization.
//!
//! The writer escapes everything it generates itself, but Markdown permits
//! raw HTML blocks and inline HTML, which flow through to the output. The
//! whole converted document is therefore passed through ammonia before code
//! block placeholders are substituted: script tags, inline event handlers,
//! and any element or attribute outside the allow-list never survive.
//!
//! The allow-list extends ammonia's defaults only for markup the writer
//! emits: heading ids (deep links), task list checkboxes, and table cell
//! alignment. Comments are kept: the writer marks fenced code blocks with
//! comment markers for later substitution, and it already removes comments
//! from raw author HTML, so the only comments reaching this point are the
//! writer's own.

/// Sanitize a converted document.
///
/// Output is deterministic for a given input.
pub(crate) fn clean_document(html: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder
        .strip_comments(false)
        .add_tag_attributes("h1", &["id"])
        .add_tag_attributes("h2", &["id"])
        .add_tag_attributes("h3", &["id"])
        .add_tag_attributes("h4", &["id"])
        .add_tag_attributes("h5", &["id"])
        .add_tag_attributes("h6", &["id"])
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .add_tag_attributes("td", &["align"])
        .add_tag_attributes("th", &["align"]);
    builder.clean(html).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_tag_removed_with_content() {
        let out = clean_document("<p>before</p><script>alert(1)</script><p>after</p>");
        assert!(!out.contains("script"));
        assert!(!out.contains("alert"));
        assert!(out.contains("<p>before</p>"));
        assert!(out.contains("<p>after</p>"));
    }

    #[test]
    fn test_event_handler_attribute_removed() {
        let out = clean_document(r#"<p onclick="alert(1)">text</p>"#);
        assert!(!out.contains("onclick"));
        assert!(out.contains("text"));
    }

    #[test]
    fn test_javascript_url_removed() {
        let out = clean_document(r#"<a href="javascript:alert(1)">link</a>"#);
        assert!(!out.contains("javascript:"));
    }

    #[test]
    fn test_heading_id_preserved() {
        let out = clean_document(r#"<h2 id="section-title">Section Title</h2>"#);
        assert!(out.contains(r#"id="section-title""#));
    }

    #[test]
    fn test_checkbox_preserved() {
        let out = clean_document(r#"<li><input type="checkbox" checked disabled>done</li>"#);
        assert!(out.contains("checkbox"));
        assert!(out.contains("disabled"));
    }

    #[test]
    fn test_cell_alignment_preserved() {
        let out = clean_document(r#"<table><tbody><tr><td align="center">x</td></tr></tbody></table>"#);
        assert!(out.contains(r#"align="center""#));
    }

    #[test]
    fn test_code_block_marker_survives() {
        let out = clean_document("<p>a</p><!--code-block-0--><p>b</p>");
        assert!(out.contains("<!--code-block-0-->"));
    }

    #[test]
    fn test_iframe_removed() {
        let out = clean_document(r#"<iframe src="https://example.com"></iframe>"#);
        assert!(!out.contains("iframe"));
    }

    #[test]
    fn test_deterministic() {
        let input = r#"<p class="x" id="y">hi</p><em>there</em>"#;
        assert_eq!(clean_document(input), clean_document(input));
    }
}
