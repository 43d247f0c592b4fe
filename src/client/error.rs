//! Error types for the cache client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors that can occur when talking to a cache server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server address could not be used as a base URL
    #[error("Invalid server address: {0}")]
    InvalidUrl(String),

    /// Connection, timeout or body decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("Server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    /// Returns `true` if the request ran out of time, either on the client
    /// side or at the server's deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::Http(err) => err.is_timeout(),
            ClientError::Status { status, .. } => *status == StatusCode::GATEWAY_TIMEOUT,
            ClientError::InvalidUrl(_) => false,
        }
    }

    /// Builds a `Status` error, using the server's JSON error message when
    /// the body carries one.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        ClientError::Status { status, message }
    }
}
