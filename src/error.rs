//! Error types for the Coredata API client.
//!
//! Every fallible operation in this crate returns [`CoredataError`]. The
//! client never retries: the first failure is surfaced immediately to the
//! caller, and callers wanting retry behavior must layer it on themselves.
//!
//! # Example
//!
//! ```rust
//! use coredata_api::{CoredataClient, CoredataError, Credentials};
//!
//! let result = CoredataClient::new("example.coredata.is", Credentials::new("user", "pass"));
//! assert!(matches!(result, Err(CoredataError::InvalidHost { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur when talking to the Coredata API.
#[derive(Debug, Error)]
pub enum CoredataError {
    /// The supplied host is missing a URI scheme.
    ///
    /// Raised at client construction, before any network activity.
    #[error("Invalid host '{host}': missing scheme (e.g. 'https://example.coredata.is').")]
    InvalidHost {
        /// The host string that was rejected.
        host: String,
    },

    /// The server reported a failure and supplied an error message.
    ///
    /// Carries the `error_message` field of the server's error body.
    #[error("Error! {message}")]
    Remote {
        /// The server-supplied error message.
        message: String,
    },

    /// The server responded with a non-success status and no decodable
    /// error message.
    #[error("Error occured! Status code is {code} for {url}")]
    Status {
        /// The HTTP status code returned.
        code: u16,
        /// The URL that was requested.
        url: String,
    },

    /// A create response was missing its `Location` header.
    #[error("Create response from {url} is missing a Location header.")]
    MissingLocation {
        /// The URL that was requested.
        url: String,
    },

    /// The `content` sub-entity serves opaque bytes, not JSON.
    ///
    /// Returned when [`get`](crate::CoredataClient::get) is asked for the
    /// content sub-entity; use
    /// [`get_content`](crate::CoredataClient::get_content) instead.
    #[error("The content sub-entity is raw bytes; fetch it with get_content.")]
    ContentIsOpaque,

    /// The supplied collection name does not map to a known entity.
    #[error("Unknown entity '{name}'.")]
    UnknownEntity {
        /// The unrecognized collection name.
        name: String,
    },

    /// A transport-level failure from the underlying HTTP client.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// A URL could not be parsed or composed.
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),

    /// A response body could not be decoded as the expected JSON shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}
