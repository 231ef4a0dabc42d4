use crate::evm::types::EvmError;

/// Errors surfaced by the contract services and, unchanged, by the facades over them
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("EVM error: {0}")]
    Evm(#[from] EvmError),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),
}

impl Error {
    /// True when the error originates from a contract revert
    pub fn is_revert(&self) -> bool {
        matches!(self, Error::Evm(EvmError::TransactionReverted(_)))
    }

    /// True when the operation was aborted through its cancellation token
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }
}
