use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// Reviews attached to a single book, keyed by reviewer identifier.
///
/// Keys are plain strings so a stored document round-trips even when it
/// contains names that would not pass [`crate::Identifier::new`].
pub type Reviews = BTreeMap<String, String>;

/// Body of a review.
///
/// Any string is accepted, including the empty string. What is rejected is a
/// payload that is not a string at all (number, object, `null`, missing).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewText(String);

impl ReviewText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Extract the review from a JSON value, which must be a string.
    pub fn from_json(value: Option<&Value>) -> Result<Self, TypeError> {
        match value {
            Some(Value::String(text)) => Ok(Self(text.clone())),
            _ => Err(TypeError::NotAString { field: "review" }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
