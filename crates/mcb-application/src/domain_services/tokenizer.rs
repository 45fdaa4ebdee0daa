//! Text tokenizer (C2)
//!
//! `tokenize(text) -> [term]`, shared by the parser (keyword extraction), the
//! BM25 index (term frequency), and the hybrid retriever (query tokenizing).
//! Pure function of its input: no I/O, deterministic output.

use unicode_segmentation::UnicodeSegmentation;

const STOP_WORDS: &[&str] = &["the", "a", "an", "get", "set", "this", "return"];

/// Stateless tokenizer. Cheap to construct; kept as a unit struct so call
/// sites can hold an `Arc<Tokenizer>` alongside other collaborators without
/// special-casing "the free function".
#[derive(Debug, Default, Clone, Copy)]
pub struct Tokenizer;

impl Tokenizer {
    /// Construct a tokenizer.
    pub fn new() -> Self {
        Self
    }

    /// Split `text` into terms, preserving multiplicity (needed for BM25 term
    /// frequency). Terms are lowercased unless `case_sensitive` is set.
    ///
    /// camelCase/PascalCase identifiers are split on case boundaries and the
    /// split parts *and* the joined whole are all emitted — e.g.
    /// `"BookController"` yields `"book"`, `"controller"`, `"bookcontroller"`.
    /// Stop words are removed after splitting.
    pub fn tokenize(&self, text: &str, case_sensitive: bool) -> Vec<String> {
        let mut terms = Vec::new();
        for word in split_alphanumeric_runs(text) {
            let parts = split_camel_case(&word);
            if parts.len() > 1 {
                let joined: String = parts.concat();
                terms.push(joined);
                terms.extend(parts);
            } else {
                terms.extend(parts);
            }
        }

        terms
            .into_iter()
            .map(|t| if case_sensitive { t } else { t.to_lowercase() })
            .filter(|t| !is_stop_word(t))
            .collect()
    }

    /// Deduplicated terms, suitable for the `keywords` field of a [`mcb_domain::entities::Chunk`].
    pub fn keywords(&self, text: &str, case_sensitive: bool) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for term in self.tokenize(text, case_sensitive) {
            if seen.insert(term.clone()) {
                out.push(term);
            }
        }
        out
    }
}

fn is_stop_word(term: &str) -> bool {
    STOP_WORDS.contains(&term)
}

/// Split on any run of non-alphanumeric characters.
fn split_alphanumeric_runs(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_string()).collect()
}

/// Split a single identifier on camelCase/PascalCase boundaries.
/// `"BookController"` -> `["Book", "Controller"]`, `"http2Client"` -> `["http2", "Client"]`.
/// A word with no case transitions is returned unchanged as a single-element vec.
fn split_camel_case(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        let boundary = i > 0
            && !current.is_empty()
            && ((c.is_uppercase() && chars[i - 1].is_lowercase())
                || (c.is_uppercase()
                    && i + 1 < chars.len()
                    && chars[i + 1].is_lowercase()
                    && chars[i - 1].is_uppercase()));
        if boundary {
            parts.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_joins_camel_case() {
        let tok = Tokenizer::new();
        let terms = tok.tokenize("BookController", false);
        assert!(terms.contains(&"book".to_string()));
        assert!(terms.contains(&"controller".to_string()));
        assert!(terms.contains(&"bookcontroller".to_string()));
    }

    #[test]
    fn strips_stop_words() {
        let tok = Tokenizer::new();
        let terms = tok.tokenize("return this value", false);
        assert!(!terms.contains(&"return".to_string()));
        assert!(!terms.contains(&"this".to_string()));
        assert!(terms.contains(&"value".to_string()));
    }

    #[test]
    fn tokenize_is_deterministic() {
        let tok = Tokenizer::new();
        assert_eq!(
            tok.tokenize("fn fetchBookById", false),
            tok.tokenize("fn fetchBookById", false)
        );
    }

    #[test]
    fn keywords_are_deduplicated() {
        let tok = Tokenizer::new();
        let kw = tok.keywords("Book book = new Book()", false);
        let book_count = kw.iter().filter(|k| *k == "book").count();
        assert_eq!(book_count, 1);
    }

    #[test]
    fn case_sensitive_mode_preserves_case() {
        let tok = Tokenizer::new();
        let terms = tok.tokenize("Book", true);
        assert!(terms.contains(&"Book".to_string()));
    }
}
