use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("status code was [{}]", .status.as_u16())]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("no cookies found")]
    NoCookies,
}

impl ClientError {
    /// HTTP status the service answered with, when it answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Connecting to database failed: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Starting transaction failed: {0}")]
    TransactionBegin(#[source] sqlx::Error),

    #[error("Committing transaction failed: {0}")]
    TransactionCommit(#[source] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token header is invalid: {0}")]
    Header(#[source] jsonwebtoken::errors::Error),

    #[error("token does not have three segments")]
    Segments,

    #[error("token payload is not base64url: {0}")]
    Payload(#[source] base64::DecodeError),

    #[error("token claims are not valid JSON: {0}")]
    Claims(#[source] serde_json::Error),
}
