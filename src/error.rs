/**
 * Error Types
 * Failures that abort a challenge invocation
 *
 * Empty lookups and non-matching faces are not errors; they surface as an
 * unanswered challenge or `answerCorrect = false`.
 */

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Required environment variable is missing or empty
    #[error("Missing required environment variable: {variable}")]
    Config { variable: &'static str },

    /// Index store query failed
    #[error("Index store query failed: {0}")]
    IndexStore(String),

    /// User carries no value for the index store lookup attribute
    #[error("User has no '{attribute}' attribute to look up")]
    MissingLookupAttribute { attribute: &'static str },

    /// Face similarity search failed
    #[error("Face search failed: {0}")]
    FaceMatcher(String),

    /// Lookup key resolved to more than one face reference
    #[error("Lookup key matched {count} face references, expected at most one")]
    AmbiguousFaceReference { count: usize },
}

impl Error {
    pub fn config(variable: &'static str) -> Self {
        Self::Config { variable }
    }

    pub fn index_store(detail: impl Into<String>) -> Self {
        Self::IndexStore(detail.into())
    }

    pub fn face_matcher(detail: impl Into<String>) -> Self {
        Self::FaceMatcher(detail.into())
    }
}
