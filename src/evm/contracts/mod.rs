/// Contract services
///
/// The generic contract handler and the ERC-20 token service, each as a trait plus an
/// implementation backed by [`EvmClient`](crate::evm::client::EvmClient).
pub mod erc20;
pub mod handler;

// Re-export commonly used types
pub use erc20::{balance_storage_slot, Erc20ContractService, Erc20Service, IERC20};
pub use handler::{
    ContractEvent, ContractFunction, ContractHandler, CustomRawDecoder, EvmContractHandler,
};
