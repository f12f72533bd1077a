use std::sync::Arc;

use shelf_store::{Collection, DocumentStore};
use shelf_types::{Book, Reviews};
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};

pub(crate) const BOOK_NOT_FOUND: &str = "Book not found";

/// The book catalog.
///
/// Every call reads the whole stored document. Lookups by key fail
/// `NotFound`; searches return an empty list when nothing matches.
pub struct CatalogStore {
    books: Collection<Vec<Book>>,
}

impl CatalogStore {
    pub fn new(store: Arc<dyn DocumentStore<Vec<Book>>>) -> Self {
        Self {
            books: Collection::new(store),
        }
    }

    /// Every book, in stored order.
    pub fn all(&self) -> ServiceResult<Vec<Book>> {
        Ok(self.books.snapshot()?)
    }

    /// The book with this ISBN.
    pub fn by_key(&self, isbn: &str) -> ServiceResult<Book> {
        self.all()?
            .into_iter()
            .find(|b| b.isbn == isbn)
            .ok_or_else(|| ServiceError::not_found(BOOK_NOT_FOUND))
    }

    /// Books whose author contains `query`, ignoring case.
    pub fn by_author(&self, query: &str) -> ServiceResult<Vec<Book>> {
        let found: Vec<Book> = self
            .all()?
            .into_iter()
            .filter(|b| b.author_contains(query))
            .collect();
        debug!(query, matches = found.len(), "author search");
        Ok(found)
    }

    /// Books whose title contains `query`, ignoring case.
    pub fn by_title(&self, query: &str) -> ServiceResult<Vec<Book>> {
        let found: Vec<Book> = self
            .all()?
            .into_iter()
            .filter(|b| b.title_contains(query))
            .collect();
        debug!(query, matches = found.len(), "title search");
        Ok(found)
    }

    /// Reviews of a book; empty if the book has none yet.
    pub fn reviews_of(&self, isbn: &str) -> ServiceResult<Reviews> {
        Ok(self.by_key(isbn)?.reviews_or_empty())
    }

    /// Overwrite the whole catalog.
    pub fn replace_all(&self, books: &[Book]) -> ServiceResult<()> {
        self.books.replace_all(&books.to_vec())?;
        info!(count = books.len(), "catalog replaced");
        Ok(())
    }

    /// Serialized read-modify-write of the whole catalog.
    ///
    /// `f` sees the current catalog; if it returns `Ok` the modified catalog
    /// is persisted, otherwise nothing is written.
    pub fn modify<R>(
        &self,
        f: impl FnOnce(&mut Vec<Book>) -> ServiceResult<R>,
    ) -> ServiceResult<R> {
        self.books.modify(f)
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("books", &self.books)
            .finish()
    }
}
