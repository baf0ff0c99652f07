//! Error types for the pet service client.
//!
//! # Design
//! Only local faults are errors. Whatever status the service answers with,
//! including 403 and 500, comes back as an `ApiResponse` so callers can
//! assert on it. `MalformedAuthKey` is the one fault a caller can provoke
//! through the public API by passing the payload of a failed login on to a
//! call that needs a key.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by `PetFriendsClient` builders and `PetFriends` calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The auth key payload is not a JSON object with a string `key` field.
    #[error("auth key is not a key mapping: {found}")]
    MalformedAuthKey { found: String },

    /// The photo file could not be read.
    #[error("cannot read pet photo {}: {source}", .path.display())]
    PhotoUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request never produced an HTTP response (DNS, connect, TLS, IO).
    #[error("transport failed: {0}")]
    Transport(String),

    /// Settings could not be assembled from the environment.
    #[error("configuration: {0}")]
    Config(String),
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
