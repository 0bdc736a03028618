//! Error types for sweepit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required configuration: {0}")]
    ConfigMissing(String),

    #[error("failed to fetch listing for {path}: {message}")]
    ListingFetch { path: String, message: String },

    #[error("failed to fetch stats for {uri}: {message}")]
    StatsFetch { uri: String, message: String },

    #[error("delete of {uri} failed with status {status}: {body}")]
    Delete { uri: String, status: u16, body: String },

    #[error("reindex request failed: {0}")]
    Reindex(String),

    #[error("http client error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, Error>;
