use thiserror::Error;

/// Errors produced when constructing domain values from raw input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be a string")]
    NotAString { field: &'static str },
}
