//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or a URL that could not be built).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status. `body` holds the response text,
    /// or the canonical reason phrase when the body was empty.
    #[error("Request failed ({status}): {body}")]
    HttpStatus { status: u16, body: String },
    /// The API answered 2xx but the body did not match the expected shape.
    #[error("Malformed response body")]
    MalformedResponse,
}
