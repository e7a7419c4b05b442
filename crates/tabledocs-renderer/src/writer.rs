//! Markdown event stream to HTML conversion.
//!
//! Consumes `pulldown-cmark` events and writes HTML directly into a string
//! buffer. All text content is escaped on emission; raw HTML events pass
//! through (minus comments) and are handled by the document-level sanitizer.
//!
//! Fenced code blocks are highlighted eagerly but emitted as comment
//! markers, substituted after sanitization so the allow-list never has to
//! cover highlighter markup. The markers cannot be forged from a document:
//! escaped text cannot produce a comment, and comments in raw HTML are
//! stripped before they reach the output.

use std::borrow::Cow;
use std::fmt::Write;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Tag, TagEnd};

use crate::highlight::{self, HighlightError};
use crate::slug::SlugCounter;

/// Table of contents entry collected from headings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (2-6; the first H1 becomes the document title).
    pub level: u8,
    /// Plain heading text.
    pub title: String,
    /// Slug id assigned to the heading.
    pub id: String,
}

/// Escape text for safe inclusion in HTML.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Marker emitted in place of the `index`-th fenced code block.
pub(crate) fn code_block_marker(index: usize) -> String {
    format!("<!--code-block-{index}-->")
}

/// Remove HTML comments from a raw HTML fragment.
///
/// Comments are reserved for code block markers; a comment written by the
/// document author must never survive into the writer output, or it could
/// collide with a marker. An unterminated comment swallows the rest of the
/// fragment, matching how an HTML parser would treat it.
fn strip_html_comments(html: &str) -> Cow<'_, str> {
    let Some(mut at) = html.find("<!--") else {
        return Cow::Borrowed(html);
    };
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    loop {
        out.push_str(&rest[..at]);
        rest = match rest[at + 4..].find("-->") {
            Some(end) => &rest[at + 4 + end + 3..],
            None => "",
        };
        match rest.find("<!--") {
            Some(next) => at = next,
            None => {
                out.push_str(rest);
                return Cow::Owned(out);
            }
        }
    }
}

/// Converted document before sanitization and marker substitution.
pub(crate) struct WriterOutput {
    /// HTML with comment markers for fenced code blocks.
    pub(crate) html: String,
    /// Highlighted code block markup, indexed by marker number.
    pub(crate) code_blocks: Vec<String>,
    /// Text of the first H1 heading.
    pub(crate) title: Option<String>,
    /// Collected table of contents.
    pub(crate) toc: Vec<TocEntry>,
}

/// State of an open fenced or indented code block.
#[derive(Default)]
struct CodeBlockState {
    active: bool,
    lang: Option<String>,
    diff: bool,
    buffer: String,
}

/// State of an open heading while its inline content is captured.
#[derive(Default)]
struct HeadingState {
    level: Option<u8>,
    text: String,
    html: String,
}

impl HeadingState {
    fn is_active(&self) -> bool {
        self.level.is_some()
    }
}

/// Alignment tracking for the table currently being written.
#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

impl TableState {
    fn align_attr(&self) -> &'static str {
        match self.alignments.get(self.cell) {
            Some(Alignment::Left) => r#" align="left""#,
            Some(Alignment::Center) => r#" align="center""#,
            Some(Alignment::Right) => r#" align="right""#,
            _ => "",
        }
    }
}

/// Event-driven HTML writer.
pub(crate) struct HtmlWriter {
    output: String,
    code: CodeBlockState,
    code_blocks: Vec<String>,
    heading: HeadingState,
    table: TableState,
    image_alt: Option<String>,
    pending_image: Option<(String, String)>,
    list_stack: Vec<bool>,
    slugs: SlugCounter,
    toc: Vec<TocEntry>,
    title: Option<String>,
}

impl HtmlWriter {
    pub(crate) fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            code_blocks: Vec::new(),
            heading: HeadingState::default(),
            table: TableState::default(),
            image_alt: None,
            pending_image: None,
            list_stack: Vec::new(),
            slugs: SlugCounter::new(),
            toc: Vec::new(),
            title: None,
        }
    }

    /// Consume the event stream and produce the converted document.
    pub(crate) fn run<'a, I>(mut self, events: I) -> Result<WriterOutput, HighlightError>
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event)?;
        }
        Ok(WriterOutput {
            html: self.output,
            code_blocks: self.code_blocks,
            title: self.title,
            toc: self.toc,
        })
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<(), HighlightError> {
        match event {
            Event::Start(tag) => self.start_tag(&tag),
            Event::End(tag) => self.end_tag(tag)?,
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => {
                self.output.push_str(&strip_html_comments(&html));
            }
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
        Ok(())
    }

    /// Push inline content to the heading buffer or the output.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.html.push_str(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn start_tag(&mut self, tag: &Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the id is known.
                self.heading.level = Some(heading_level_to_num(*level));
                self.heading.text.clear();
                self.heading.html.clear();
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let (lang, diff) = match kind {
                    CodeBlockKind::Fenced(info) if !info.is_empty() => parse_fence_info(info),
                    _ => (None, false),
                };
                self.code.active = true;
                self.code.lang = lang;
                self.code.diff = diff;
                self.code.buffer.clear();
            }
            Tag::List(start) => {
                self.list_stack.push(start.is_some());
                match start {
                    Some(1) => self.output.push_str("<ol>"),
                    Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                    None => self.output.push_str("<ul>"),
                }
            }
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments: alignments.clone(),
                    in_head: false,
                    cell: 0,
                };
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell = 0;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.cell = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let tag = if self.table.in_head { "th" } else { "td" };
                let align = self.table.align_attr();
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                let link = format!(r#"<a href="{}">"#, escape_html(dest_url));
                self.push_inline(&link);
            }
            Tag::Image { dest_url, title, .. } => {
                // Alt text is collected from inner events.
                self.image_alt = Some(String::new());
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<(), HighlightError> {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => self.finish_heading(),
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => {
                let lang = self.code.lang.take();
                let diff = self.code.diff;
                let source = std::mem::take(&mut self.code.buffer);
                self.code.active = false;

                let html = highlight::highlight_fence(lang.as_deref(), diff, &source)?;
                let index = self.code_blocks.len();
                self.code_blocks.push(html);
                self.output.push_str(&code_block_marker(index));
            }
            TagEnd::List(ordered) => {
                self.list_stack.pop();
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.table.in_head = false;
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output
                    .push_str(if self.table.in_head { "</th>" } else { "</td>" });
                self.table.cell += 1;
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                let alt = self.image_alt.take().unwrap_or_default();
                if let Some((src, title)) = self.pending_image.take() {
                    self.write_image(&src, &alt, &title);
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
        Ok(())
    }

    fn finish_heading(&mut self) {
        let Some(level) = self.heading.level.take() else {
            return;
        };
        let text = std::mem::take(&mut self.heading.text);
        let html = std::mem::take(&mut self.heading.html);
        let id = self.slugs.assign(&text);

        if level == 1 && self.title.is_none() {
            self.title = Some(text.clone());
        } else if level >= 2 {
            self.toc.push(TocEntry {
                level,
                title: text,
                id: id.clone(),
            });
        }

        write!(
            self.output,
            r#"<h{level} id="{id}">{}</h{level}>"#,
            html.trim()
        )
        .unwrap();
    }

    fn text(&mut self, text: &str) {
        if self.code.active {
            self.code.buffer.push_str(text);
        } else if let Some(alt) = self.image_alt.as_mut() {
            alt.push_str(text);
        } else if self.heading.is_active() {
            self.heading.text.push_str(text);
            self.heading.html.push_str(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.heading.is_active() {
            self.heading.text.push_str(code);
            write!(self.heading.html, "<code>{}</code>", escape_html(code)).unwrap();
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn soft_break(&mut self) {
        if self.code.active {
            self.code.buffer.push('\n');
        } else {
            self.output.push('\n');
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        self.output.push_str(if checked {
            r#"<input type="checkbox" checked disabled>"#
        } else {
            r#"<input type="checkbox" disabled>"#
        });
    }

    fn write_image(&mut self, src: &str, alt: &str, title: &str) {
        if title.is_empty() {
            write!(
                self.output,
                r#"<img src="{}" alt="{}">"#,
                escape_html(src),
                escape_html(alt)
            )
            .unwrap();
        } else {
            write!(
                self.output,
                r#"<img src="{}" title="{}" alt="{}">"#,
                escape_html(src),
                escape_html(title),
                escape_html(alt)
            )
            .unwrap();
        }
    }
}

/// Convert a heading level enum to its numeric level (1-6).
fn heading_level_to_num(level: pulldown_cmark::HeadingLevel) -> u8 {
    use pulldown_cmark::HeadingLevel;
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Parse a fence info string into a language token and diff flag.
///
/// The first whitespace-separated token is the language; a `diff` token
/// anywhere (or `diff` as the language itself) enables diff annotation.
fn parse_fence_info(info: &str) -> (Option<String>, bool) {
    let mut tokens = info.split_whitespace();
    let lang = tokens.next().map(str::to_owned);
    let diff = lang.as_deref() == Some("diff") || tokens.any(|t| t == "diff");
    (lang, diff)
}
