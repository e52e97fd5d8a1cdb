//! Catalog fetch error types

use thiserror::Error;

/// Why a catalog load did not produce vehicles
#[derive(Error, Debug)]
pub enum FetchError {
    /// The API answered with a non-success HTTP status
    #[error("Network error ({status})")]
    Network { status: u16 },

    /// The API answered, but the payload status was not `ok`
    #[error("{message}")]
    Api { message: String },

    /// A newer load superseded this one
    ///
    /// Never shown to the user.
    #[error("Catalog load was cancelled")]
    Cancelled,

    /// The request never produced a response (DNS, connect, timeout)
    #[error("Failed to reach the catalog API: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body was not a catalog payload
    #[error("Failed to parse the catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// Message to show in place of the table, `None` for cancellations
    pub fn user_message(&self) -> Option<String> {
        if self.is_cancelled() {
            None
        } else {
            Some(self.to_string())
        }
    }
}
