use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shelf_types::{Book, Reviews};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Where `shelf serve` listens unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Client for the public catalog routes of a running Shelf server.
#[derive(Debug, Clone)]
pub struct ShelfClient {
    base: Url,
    http: Client,
}

impl ShelfClient {
    /// Client rooted at `base`. A path prefix on `base` is kept, so
    /// `http://host/shelf` resolves books at `http://host/shelf/books`.
    pub fn new(base: &str) -> ClientResult<Self> {
        Self::with_http(base, Client::new())
    }

    pub fn with_http(base: &str, http: Client) -> ClientResult<Self> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::NotABase(base.to_string()));
        }
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /books`
    pub async fn list_books(&self) -> ClientResult<Vec<Book>> {
        self.get(&["books"]).await
    }

    /// `GET /books/isbn/{isbn}`. An unknown ISBN is an `Api` error with 404.
    pub async fn book_by_isbn(&self, isbn: &str) -> ClientResult<Book> {
        self.get(&["books", "isbn", isbn]).await
    }

    /// `GET /books/author/{author}`: case-insensitive substring match.
    pub async fn books_by_author(&self, author: &str) -> ClientResult<Vec<Book>> {
        self.get(&["books", "author", author]).await
    }

    /// `GET /books/title/{title}`: case-insensitive substring match.
    pub async fn books_by_title(&self, title: &str) -> ClientResult<Vec<Book>> {
        self.get(&["books", "title", title]).await
    }

    /// `GET /books/{isbn}/review`
    pub async fn book_reviews(&self, isbn: &str) -> ClientResult<Reviews> {
        self.get(&["books", isbn, "review"]).await
    }

    /// Append `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::NotABase(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let body = response.text().await?;
        Err(ClientError::Api {
            status,
            message: error_message(&body),
        })
    }
}

/// The `error` field of a `{"error": "..."}` body, or the body itself.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| body.to_string())
}
