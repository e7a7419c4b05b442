//! Heading slug generation.
//!
//! Slugs are stable for a given document: the same heading text always
//! produces the same id, and repeated headings get `-1`, `-2` suffixes in
//! document order, skipping any id already taken by literal heading text.

use std::collections::{HashMap, HashSet};

/// Convert heading text to a URL-safe slug.
///
/// Lowercases, keeps alphanumerics, and collapses separator runs into single
/// hyphens. Punctuation is dropped.
///
/// # Examples
///
/// ```
/// use tabledocs_renderer::slugify;
///
/// assert_eq!(slugify("Section Title"), "section-title");
/// assert_eq!(slugify("Install `npm`"), "install-npm");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_sep = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            for lc in c.to_lowercase() {
                slug.push(lc);
            }
        } else {
            pending_sep = true;
        }
    }

    if slug.is_empty() {
        "section".to_owned()
    } else {
        slug
    }
}

/// Assigns unique heading ids within a single document.
#[derive(Default)]
pub(crate) struct SlugCounter {
    seen: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl SlugCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Produce a unique id for the given heading text.
    ///
    /// The first occurrence gets the bare slug; later occurrences get a
    /// numeric suffix (`faq`, `faq-1`, `faq-2`). A suffixed id can also be
    /// claimed by literal heading text (`FAQ 1` slugifies to `faq-1`), so
    /// the suffix is bumped past every id already handed out.
    pub(crate) fn assign(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let mut count = self.seen.get(&slug).copied().unwrap_or(0);
        let mut id = if count == 0 {
            slug.clone()
        } else {
            format!("{slug}-{count}")
        };
        while !self.taken.insert(id.clone()) {
            count += 1;
            id = format!("{slug}-{count}");
        }
        self.seen.insert(slug, count + 1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Section Title"), "section-title");
    }

    #[test]
    fn test_slugify_punctuation_dropped() {
        assert_eq!(slugify("What's new?"), "what-s-new");
        assert_eq!(slugify("Install `npm`"), "install-npm");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a - b -- c"), "a-b-c");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("- leading dash"), "leading-dash");
    }

    #[test]
    fn test_slugify_unicode_lowercased() {
        assert_eq!(slugify("Türkçe Başlık"), "türkçe-başlık");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify("!!!"), "section");
        assert_eq!(slugify(""), "section");
    }

    #[test]
    fn test_counter_deduplicates() {
        let mut counter = SlugCounter::new();
        assert_eq!(counter.assign("FAQ"), "faq");
        assert_eq!(counter.assign("FAQ"), "faq-1");
        assert_eq!(counter.assign("FAQ"), "faq-2");
        assert_eq!(counter.assign("Other"), "other");
    }

    #[test]
    fn test_counter_skips_ids_taken_by_literal_text() {
        let mut counter = SlugCounter::new();
        assert_eq!(counter.assign("FAQ"), "faq");
        assert_eq!(counter.assign("FAQ 1"), "faq-1");
        assert_eq!(counter.assign("FAQ"), "faq-2");
        assert_eq!(counter.assign("FAQ"), "faq-3");
    }

    #[test]
    fn test_counter_suffixes_literal_text_already_generated() {
        let mut counter = SlugCounter::new();
        assert_eq!(counter.assign("FAQ"), "faq");
        assert_eq!(counter.assign("FAQ"), "faq-1");
        assert_eq!(counter.assign("FAQ 1"), "faq-1-1");
    }
}
