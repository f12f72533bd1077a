use serde::{Deserialize, Serialize};

use crate::review::Reviews;

/// A catalog record.
///
/// `reviews` stays `None` until the first review is written, and is omitted
/// from the stored document in that state. Once created the mapping is kept,
/// even if every review is later deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Reviews>,
}

impl Book {
    pub fn new(isbn: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            reviews: None,
        }
    }

    /// Reviews of this book, or an empty mapping if none were ever written.
    pub fn reviews_or_empty(&self) -> Reviews {
        self.reviews.clone().unwrap_or_default()
    }

    /// Case-insensitive substring match on the author.
    pub fn author_contains(&self, query: &str) -> bool {
        contains_ignore_case(&self.author, query)
    }

    /// Case-insensitive substring match on the title.
    pub fn title_contains(&self, query: &str) -> bool {
        contains_ignore_case(&self.title, query)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kahneman() -> Book {
        Book::new("9780374533557", "Thinking, Fast and Slow", "Daniel Kahneman")
    }

    #[test]
    fn author_match_ignores_case() {
        let book = kahneman();
        assert!(book.author_contains("kahneman"));
        assert!(book.author_contains("KAHNEMAN"));
        assert!(!book.author_contains("tversky"));
    }

    #[test]
    fn title_match_ignores_case() {
        let book = kahneman();
        assert!(book.title_contains("fast and"));
        assert!(!book.title_contains("slowly"));
    }

    #[test]
    fn empty_query_matches() {
        assert!(kahneman().author_contains(""));
    }

    #[test]
    fn absent_reviews_omitted_from_json() {
        let json = serde_json::to_value(kahneman()).unwrap();
        assert!(json.get("reviews").is_none());
        assert_eq!(json["isbn"], "9780374533557");
    }

    #[test]
    fn emptied_reviews_kept_in_json() {
        let mut book = kahneman();
        book.reviews = Some(Reviews::new());
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["reviews"], serde_json::json!({}));
    }

    #[test]
    fn reviews_or_empty_defaults() {
        assert!(kahneman().reviews_or_empty().is_empty());
    }

    proptest! {
        #[test]
        fn author_search_is_case_insensitive(author in "[a-zA-Z ]{1,24}", start in 0usize..24, len in 0usize..24) {
            let book = Book::new("0", "t", author.clone());
            let start = start.min(author.len());
            let end = (start + len).min(author.len());
            let query = &author[start..end];
            prop_assert!(book.author_contains(&query.to_uppercase()));
            prop_assert!(book.author_contains(&query.to_lowercase()));
        }
    }
}
