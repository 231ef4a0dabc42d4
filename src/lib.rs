pub mod config;
pub mod error;
pub mod evm;
pub mod facade;

// Main exports
pub use config::EvmConfig;
pub use error::Error;
pub use evm::{
    ContractEvent, ContractFunction, ContractHandler, CustomRawDecoder, Erc20ContractService,
    Erc20Service, EvmClient, EvmContractHandler, FunctionMessage,
};
pub use facade::{ContractHandlerFacade, Erc20ContractFacade};

// Re-export the alloy types that appear in the public API
pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use alloy_rpc_types_eth::{BlockId, BlockNumberOrTag, TransactionReceipt};
pub use tokio_util::sync::CancellationToken;
