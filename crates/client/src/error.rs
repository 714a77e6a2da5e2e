//! Client construction errors.

use thiserror::Error;

/// Errors raised while assembling a client. Call-time failures are
/// [`lendwise_shared::ApiError`] values instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
