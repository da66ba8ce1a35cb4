//! Index operation error types.
//!
//! Every public operation either succeeds with a typed value or fails with
//! exactly one of these kinds.

use thiserror::Error;

/// Errors that can occur during index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The request failed in transit or the service answered with an error.
    ///
    /// `status` is `None` when no HTTP response was received at all.
    #[error("Transport error (status {status:?}): {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// A caller-supplied value was rejected before any network call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A well-formed response lacked an expected field or had the wrong shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The operation is not supported by this object.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A method was called out of protocol order.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// A backoff sleep was interrupted by a shutdown signal.
    #[error("Operation interrupted")]
    Interrupted,
}

impl IndexError {
    /// Create a transport error with an HTTP status.
    pub fn transport(status: u16, msg: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: msg.into(),
        }
    }

    /// Create a transport error for a request that never got a response.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: msg.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create an unsupported operation error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    /// Create an illegal state error.
    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// HTTP status of a transport error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IndexError>;
