//! Domain error type for contract reads and paid submissions.

use thiserror::Error;

/// Typed error enum for client operations, allowing callers to match on
/// specific failure modes instead of inspecting opaque `anyhow::Error` messages.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local input rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// A write was requested without an authenticated signing account.
    #[error("No wallet connected. Connect a wallet before sending.")]
    NoSigner,

    /// The signer declined to sign the transaction.
    #[error("Transaction rejected by signer")]
    UserRejected,

    /// The ledger refused the call during simulation or execution.
    #[error("Transaction reverted: {reason}")]
    Reverted { reason: String },

    /// Network or RPC transport failure.
    #[error("{0}")]
    Connectivity(String),

    /// Reply bytes could not be decoded against the contract ABI.
    #[error("{0}")]
    Decode(String),

    /// Invalid or missing configuration value.
    #[error("{0}")]
    Config(String),

    /// Operation not allowed in the current state.
    #[error("{0}")]
    InvalidState(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClientError {
    /// Short, human-readable line for surfacing a failed submission or read.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NoSigner => "Connect a wallet first.".into(),
            Self::UserRejected => "You rejected the transaction.".into(),
            Self::Reverted { reason } if reason.is_empty() => {
                "The contract rejected the transaction.".into()
            }
            Self::Reverted { reason } => format!("The contract rejected the transaction: {reason}"),
            Self::Connectivity(msg) => format!("Network error: {msg}"),
            Self::Decode(msg) => format!("Unexpected contract response: {msg}"),
            Self::Config(msg) | Self::InvalidState(msg) => msg.clone(),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Errors that leave the user free to try again without changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Decode(_))
    }
}

/// Alias for `std::result::Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Result whose error can be cloned, for outcomes passed around as messages.
pub type SharedResult<T> = std::result::Result<T, std::sync::Arc<ClientError>>;
