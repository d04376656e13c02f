//! Text normalization and whole-phrase matching.
//!
//! Matching is phrase-based: no stemming, no tokenization. A phrase only
//! counts when it sits between Unicode word boundaries, so "inter" does not
//! match inside "internacional" and "culé" does not match inside "culés".

use regex::Regex;

/// Lowercase a single field. Full Unicode case mapping ("ATLÉTICO" -> "atlético").
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Build the shared classification input: `lower(title) + " " + lower(body)`.
pub fn normalize_article(title: &str, body: &str) -> String {
    let title = fold_case(title);
    let body = fold_case(body);
    let mut text = String::with_capacity(title.len() + body.len() + 1);
    text.push_str(&title);
    text.push(' ');
    text.push_str(&body);
    text
}

/// Compiled whole-phrase matcher for one alias or keyword.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrase: String,
    pattern: Regex,
}

impl PhraseMatcher {
    /// Compile a matcher for `phrase`. The phrase is lowercased first and all
    /// regex metacharacters are escaped ("atl. madrid" matches literally).
    pub fn new(phrase: &str) -> Result<Self, regex::Error> {
        let phrase = fold_case(phrase.trim());
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&phrase)))?;
        Ok(Self { phrase, pattern })
    }

    /// The lowercase phrase this matcher looks for.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Count non-overlapping occurrences in already-lowercased text.
    pub fn count(&self, haystack: &str) -> usize {
        if haystack.is_empty() {
            return 0;
        }
        self.pattern.find_iter(haystack).count()
    }

    /// Check for at least one occurrence in already-lowercased text.
    pub fn is_match(&self, haystack: &str) -> bool {
        !haystack.is_empty() && self.pattern.is_match(haystack)
    }
}
