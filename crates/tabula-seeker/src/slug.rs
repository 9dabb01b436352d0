//! Text normalization for search and filter matching.
//!
//! Both forms transliterate to ASCII with `deunicode`, lowercase, and drop
//! punctuation. They differ only in word separators:
//!
//! - [`slugify`] keeps one `-` between words: `"Grade 10 / Math"` → `"grade-10-math"`
//! - [`fold`] drops separators entirely: `"O'Brien Jr."` → `"obrienjr"`

use deunicode::deunicode;

/// Normalizes text to a URL-safe slug.
///
/// Used for dropdown filter values, both for matching and as the value
/// written to the URL.
pub fn slugify(input: &str) -> String {
    normalize(input, Some('-'))
}

/// Normalizes text for free-text search.
///
/// Whitespace and punctuation are removed so that `"o'brien"`, `"O Brien"`
/// and `"OBrien"` all fold to the same key.
pub fn fold(input: &str) -> String {
    normalize(input, None)
}

fn normalize(input: &str, separator: Option<char>) -> String {
    let transliterated = deunicode(input);
    let mut out = String::with_capacity(transliterated.len());
    let mut pending_separator = false;

    for c in transliterated.chars() {
        if c.is_ascii_alphanumeric() {
            if let Some(sep) = separator {
                if pending_separator && !out.is_empty() {
                    out.push(sep);
                }
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' || c == '/' {
            pending_separator = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  padded  "), "padded");
        assert_eq!(slugify("In Progress"), "in-progress");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn slugify_drops_punctuation() {
        assert_eq!(slugify("O'Brien"), "obrien");
        assert_eq!(slugify("Done!!"), "done");
        assert_eq!(slugify("a -- b"), "a-b");
    }

    #[test]
    fn slugify_transliterates() {
        assert_eq!(slugify("Café Müller"), "cafe-muller");
    }

    #[test]
    fn fold_removes_separators() {
        assert_eq!(fold("O'Brien"), "obrien");
        assert_eq!(fold("John  Smith"), "johnsmith");
        assert_eq!(fold("john-smith"), "johnsmith");
    }

    #[test]
    fn punctuation_only_is_empty() {
        assert_eq!(slugify("?!"), "");
        assert_eq!(fold("  ... "), "");
    }
}
