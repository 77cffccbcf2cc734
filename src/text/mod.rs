//! Tokenization for documents and queries
//!
//! Documents are tokenized at index-build time and queries at search time
//! with the same function, so index terms and query terms always agree.

/// Splits text into lowercase terms
///
/// Terms are maximal runs of alphanumeric characters; everything else is a
/// separator. Empty runs are dropped.
///
/// # Examples
///
/// ```
/// use lantern::text::tokenize;
///
/// assert_eq!(tokenize("The quick-brown FOX!"), vec!["the", "quick", "brown", "fox"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_words() {
        assert_eq!(tokenize("cat dog"), vec!["cat", "dog"]);
    }

    #[test]
    fn test_lowercasing() {
        assert_eq!(tokenize("Cat DOG"), vec!["cat", "dog"]);
    }

    #[test]
    fn test_punctuation_separates() {
        assert_eq!(tokenize("cat,dog;fish"), vec!["cat", "dog", "fish"]);
    }

    #[test]
    fn test_numbers_kept() {
        assert_eq!(tokenize("rust 2021 edition"), vec!["rust", "2021", "edition"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_only_separators() {
        assert!(tokenize("... --- !!!").is_empty());
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(tokenize("caf\u{e9} na\u{ef}ve"), vec!["caf\u{e9}", "na\u{ef}ve"]);
    }
}
