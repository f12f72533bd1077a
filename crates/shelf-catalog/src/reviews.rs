use std::sync::Arc;

use shelf_types::{Book, Identifier, ReviewText, Reviews};
use tracing::info;

use crate::catalog::{CatalogStore, BOOK_NOT_FOUND};
use crate::error::{ServiceError, ServiceResult};

const REVIEW_NOT_FOUND: &str = "Review by this user not found";

/// Adds, replaces, and removes an account's review of a book.
///
/// Each call is one serialized read-modify-write of the whole catalog: load,
/// locate the book, change its review mapping, persist. A failing call writes
/// nothing. Because writers are serialized per catalog, two concurrent calls
/// (same book or not) both land.
#[derive(Clone)]
pub struct ReviewMutator {
    catalog: Arc<CatalogStore>,
}

impl ReviewMutator {
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Set `identity`'s review of `isbn` to `text`, replacing any earlier one.
    /// Returns the book's updated review mapping.
    pub fn upsert_review(
        &self,
        identity: &Identifier,
        isbn: &str,
        text: ReviewText,
    ) -> ServiceResult<Reviews> {
        let reviews = self.catalog.modify(|books| {
            let book = find_book(books, isbn)?;
            let reviews = book.reviews.get_or_insert_with(Reviews::new);
            reviews.insert(identity.as_str().to_owned(), text.into_inner());
            Ok(reviews.clone())
        })?;
        info!(user = %identity, isbn, "review added/updated");
        Ok(reviews)
    }

    /// Remove `identity`'s review of `isbn`. Fails `NotFound` if the book is
    /// unknown or holds no review by `identity`.
    pub fn delete_review(&self, identity: &Identifier, isbn: &str) -> ServiceResult<Reviews> {
        let reviews = self.catalog.modify(|books| {
            let book = find_book(books, isbn)?;
            let reviews = book
                .reviews
                .as_mut()
                .ok_or_else(|| ServiceError::not_found(REVIEW_NOT_FOUND))?;
            reviews
                .remove(identity.as_str())
                .ok_or_else(|| ServiceError::not_found(REVIEW_NOT_FOUND))?;
            Ok(reviews.clone())
        })?;
        info!(user = %identity, isbn, "review deleted");
        Ok(reviews)
    }
}

fn find_book<'a>(books: &'a mut [Book], isbn: &str) -> ServiceResult<&'a mut Book> {
    books
        .iter_mut()
        .find(|b| b.isbn == isbn)
        .ok_or_else(|| ServiceError::not_found(BOOK_NOT_FOUND))
}

impl std::fmt::Debug for ReviewMutator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewMutator")
            .field("catalog", &self.catalog)
            .finish()
    }
}
