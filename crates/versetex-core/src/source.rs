//! Passage retrieval abstraction.

/// Error retrieving a passage from the remote text service.
///
/// Every variant aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be completed (connect, timeout, body read).
    #[error("Request for passage '{passage}' failed: {message}")]
    Transport { passage: String, message: String },
    /// The service answered with a non-success status.
    #[error("Request to passage API failed with status code: {status}")]
    Status { status: u16 },
    /// The service reported an application-level error for the identifier.
    #[error("Invalid passage argument: {passage}")]
    InvalidPassage { passage: String },
}

/// Source of raw passage text.
///
/// Implementations return the service's plain-text body: the citation on the
/// first line, paragraphs on the following lines, with inline `[n]` verse
/// markers.
pub trait PassageSource {
    /// Fetch the raw text for one passage identifier.
    fn fetch(&self, passage: &str) -> Result<String, FetchError>;
}

impl<T: PassageSource + ?Sized> PassageSource for &T {
    fn fetch(&self, passage: &str) -> Result<String, FetchError> {
        (**self).fetch(passage)
    }
}
