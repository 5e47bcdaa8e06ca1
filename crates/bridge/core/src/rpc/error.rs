//! RPC-specific error types.

use alloy_transport::{TransportError, TransportErrorKind};
use thiserror::Error;

/// RPC-specific error type.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport error from alloy.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid response from RPC.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request timeout.
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A transaction could not be signed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// The node refused a transaction.
    #[error("Transaction rejected: {0}")]
    Rejected(String),
}

impl RpcError {
    /// Returns true if this error is transient and the operation should be retried.
    ///
    /// Only transport-level errors are retryable, and only for reads. Submissions are
    /// never retried.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_) | Self::Connection(_))
    }
}

impl From<TransportError> for RpcError {
    fn from(err: TransportError) -> Self {
        match &err {
            TransportError::NullResp | TransportError::DeserError { .. } => {
                Self::InvalidResponse(err.to_string())
            }
            TransportError::Transport(
                TransportErrorKind::BackendGone | TransportErrorKind::HttpError(_),
            ) => Self::Connection(err.to_string()),
            _ => Self::Transport(err.to_string()),
        }
    }
}

/// Result type alias for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
