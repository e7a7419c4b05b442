//! Syntax highlighting for fenced code blocks.
//!
//! Uses syntect with CSS classes rather than inline styles, so the same
//! markup can be themed for light and dark mode by two generated
//! stylesheets (see [`theme_css`]). Every code line is wrapped in a
//! `span.line`; diff-annotated fences additionally tag added/removed lines.
//!
//! The syntax and theme sets are loaded once per process and shared; the
//! first transform pays the load cost, subsequent transforms reuse them.

use std::fmt::Write;
use std::sync::OnceLock;

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::writer::escape_html;

/// Class style shared by highlighted markup and generated theme CSS.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Error produced by the highlighter.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// Requested theme name is not in the bundled theme set.
    #[error("Unknown highlight theme: {0}")]
    UnknownTheme(String),
    /// Syntect failed while parsing or emitting markup.
    #[error("Highlighter failure: {0}")]
    Syntax(#[from] syntect::Error),
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEMES: OnceLock<ThemeSet> = OnceLock::new();
    THEMES.get_or_init(ThemeSet::load_defaults)
}

/// Generate a stylesheet for a named bundled theme.
///
/// The CSS targets the classed markup produced by the pipeline. Call once
/// per theme of the configured light/dark pair and serve the results as
/// alternate stylesheets.
///
/// # Errors
///
/// Returns [`HighlightError::UnknownTheme`] if the name is not in the
/// bundled theme set. This is a configuration error and should fail the
/// build.
pub fn theme_css(name: &str) -> Result<String, HighlightError> {
    let theme = theme_set()
        .themes
        .get(name)
        .ok_or_else(|| HighlightError::UnknownTheme(name.to_owned()))?;
    Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
}

/// Check whether a theme name exists in the bundled set.
pub(crate) fn theme_exists(name: &str) -> bool {
    theme_set().themes.contains_key(name)
}

/// Diff annotation of a single code line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineMark {
    None,
    Added,
    Removed,
}

impl LineMark {
    fn line_class(self) -> &'static str {
        match self {
            Self::None => "line",
            Self::Added => "line diff add",
            Self::Removed => "line diff remove",
        }
    }
}

/// Render a fenced code block to highlighted HTML.
///
/// `lang` is the fence language token; unknown languages fall back to a
/// plain escaped block with the same line markup, so a missing grammar
/// never fails a build. When `diff` is set, leading `+`/`-` markers are
/// stripped and those lines get `diff add`/`diff remove` classes.
pub(crate) fn highlight_fence(
    lang: Option<&str>,
    diff: bool,
    source: &str,
) -> Result<String, HighlightError> {
    let (lines, marks) = split_marked_lines(source, diff);

    let syntax = lang
        .filter(|l| *l != "diff")
        .and_then(|l| syntax_set().find_syntax_by_token(l));

    let line_html = match syntax {
        Some(syntax) => {
            let mut generator =
                ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set(), CLASS_STYLE);
            let mut joined = lines.join("\n");
            joined.push('\n');
            for line in LinesWithEndings::from(&joined) {
                generator.parse_html_for_line_which_includes_newline(line)?;
            }
            split_balanced_lines(&generator.finalize())
        }
        None => lines.iter().map(|l| escape_html(l).into_owned()).collect(),
    };

    let mut out = String::with_capacity(source.len() * 2);
    match lang {
        Some(lang) => write!(
            out,
            r#"<pre class="highlight"><code class="language-{}">"#,
            escape_html(lang)
        )
        .unwrap(),
        None => out.push_str(r#"<pre class="highlight"><code>"#),
    }
    for (i, html) in line_html.iter().enumerate() {
        let mark = marks.get(i).copied().unwrap_or(LineMark::None);
        if i > 0 {
            out.push('\n');
        }
        write!(out, r#"<span class="{}">{html}</span>"#, mark.line_class()).unwrap();
    }
    out.push_str("</code></pre>");
    Ok(out)
}

/// Split source into lines, stripping diff markers when annotated.
///
/// A marker is a leading `+` or `-`, optionally followed by one space that
/// is stripped with it.
fn split_marked_lines(source: &str, diff: bool) -> (Vec<String>, Vec<LineMark>) {
    let mut lines = Vec::new();
    let mut marks = Vec::new();

    for line in source.lines() {
        let (text, mark) = if diff {
            match line.as_bytes().first() {
                Some(b'+') => (strip_marker(line), LineMark::Added),
                Some(b'-') => (strip_marker(line), LineMark::Removed),
                _ => (line.to_owned(), LineMark::None),
            }
        } else {
            (line.to_owned(), LineMark::None)
        };
        lines.push(text);
        marks.push(mark);
    }

    (lines, marks)
}

fn strip_marker(line: &str) -> String {
    let rest = &line[1..];
    rest.strip_prefix(' ').unwrap_or(rest).to_owned()
}

/// Split classed syntect output into one balanced HTML fragment per line.
///
/// Syntect leaves token spans open across newlines. This pass closes all
/// open spans at each line boundary and reopens them on the next line, so
/// every line can be wrapped independently.
fn split_balanced_lines(html: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix("</span>") {
            open.pop();
            current.push_str("</span>");
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('\n') {
            for _ in &open {
                current.push_str("</span>");
            }
            lines.push(std::mem::take(&mut current));
            for tag in &open {
                current.push_str(tag);
            }
            rest = stripped;
        } else if rest.starts_with('<') {
            let end = rest.find('>').map_or(rest.len(), |i| i + 1);
            let tag = &rest[..end];
            open.push(tag.to_owned());
            current.push_str(tag);
            rest = &rest[end..];
        } else {
            let next = rest.find(['<', '\n']).unwrap_or(rest.len());
            current.push_str(&rest[..next]);
            rest = &rest[next..];
        }
    }

    // A trailing fragment holding only reopened tags is not a line
    if !current.is_empty() && current != open.concat() {
        for _ in &open {
            current.push_str("</span>");
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_gets_token_spans() {
        let html = highlight_fence(Some("rust"), false, "fn main() {}\n").unwrap();
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains(r#"<span class="line">"#));
        assert!(html.contains("hl-"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain() {
        let html = highlight_fence(Some("nosuchlang"), false, "plain text\n").unwrap();
        assert!(html.contains(r#"<code class="language-nosuchlang">"#));
        assert!(html.contains(r#"<span class="line">plain text</span>"#));
        assert!(!html.contains("hl-"));
    }

    #[test]
    fn test_fallback_escapes_content() {
        let html = highlight_fence(Some("nosuchlang"), false, "<script>alert(1)</script>\n")
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_diff_lines_marked() {
        let source = "+ added line\n- removed line\ncontext line\n";
        let html = highlight_fence(Some("diff"), true, source).unwrap();
        assert!(html.contains(r#"<span class="line diff add">added line</span>"#));
        assert!(html.contains(r#"<span class="line diff remove">removed line</span>"#));
        assert!(html.contains(r#"<span class="line">context line</span>"#));
    }

    #[test]
    fn test_diff_marker_without_space() {
        let (lines, marks) = split_marked_lines("+added\n-removed\n", true);
        assert_eq!(lines, vec!["added", "removed"]);
        assert_eq!(marks, vec![LineMark::Added, LineMark::Removed]);
    }

    #[test]
    fn test_diff_with_highlighted_language() {
        let source = "+ let x = 1;\n- let x = 2;\nlet y = 3;\n";
        let html = highlight_fence(Some("rust"), true, source).unwrap();
        assert!(html.contains(r#"<span class="line diff add">"#));
        assert!(html.contains(r#"<span class="line diff remove">"#));
        // Markers are stripped before highlighting
        assert!(!html.contains("+ let"));
    }

    #[test]
    fn test_deterministic_output() {
        let source = "fn main() {\n    println!(\"hi\");\n}\n";
        let first = highlight_fence(Some("rust"), false, source).unwrap();
        let second = highlight_fence(Some("rust"), false, source).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_multiline_token_spans_balanced() {
        // Block comments keep a span open across lines; each emitted line
        // must still be balanced.
        let source = "/* first\nsecond */\n";
        let html = highlight_fence(Some("rust"), false, source).unwrap();
        for line in html.split('\n') {
            let opens = line.matches("<span").count();
            let closes = line.matches("</span>").count();
            assert_eq!(opens, closes, "unbalanced line: {line}");
        }
    }

    #[test]
    fn test_split_balanced_lines_reopens_spans() {
        let html = "<span class=\"a\">one\ntwo</span>\n";
        let lines = split_balanced_lines(html);
        assert_eq!(
            lines,
            vec![
                "<span class=\"a\">one</span>".to_owned(),
                "<span class=\"a\">two</span>".to_owned(),
            ]
        );
    }

    #[test]
    fn test_theme_css_known_theme() {
        let css = theme_css("InspiredGitHub").unwrap();
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_theme_css_unknown_theme() {
        let err = theme_css("no-such-theme").unwrap_err();
        assert!(matches!(err, HighlightError::UnknownTheme(name) if name == "no-such-theme"));
    }

    #[test]
    fn test_theme_exists() {
        assert!(theme_exists("base16-ocean.dark"));
        assert!(!theme_exists("missing"));
    }
}
