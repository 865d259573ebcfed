// src/error.rs

use thiserror::Error;

/// Everything that can go wrong while loading the page's CSV.
///
/// The loader never recovers from any of these; they reach the caller as-is.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The request could not be made, or the asset does not exist.
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success status.
    #[error("GET {url} returned {status}")]
    Status { url: String, status: u16 },

    /// The body could not be read as text.
    #[error("reading body from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

impl LoadError {
    pub(crate) fn transport<E>(url: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LoadError::Transport {
            url: url.into(),
            source: source.into(),
        }
    }
}
