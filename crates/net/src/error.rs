//! Network error types

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Network errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Hub closed")]
    HubClosed,

    #[error("Not subscribed to {0}")]
    NotSubscribed(String),
}

impl From<Error> for huddle_core::Error {
    fn from(err: Error) -> Self {
        huddle_core::Error::Transport(err.to_string())
    }
}
