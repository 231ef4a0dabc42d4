/// EVM support
///
/// JSON-RPC client, request types and the contract services the facades delegate to.
///
/// # Example
///
/// ```rust,no_run
/// use contract_facade::evm::{EvmClient, Erc20ContractService};
/// use alloy_primitives::address;
///
/// # async fn example() -> Result<(), contract_facade::Error> {
/// let client = EvmClient::new("http://localhost:8545", 1)?;
/// let usdc = client.erc20(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
/// let supply = usdc.total_supply_query(None).await?;
/// println!("Total supply: {}", supply);
/// # Ok(())
/// # }
/// ```
pub mod client;
pub mod contracts;
pub mod types;

pub use client::EvmClient;
pub use contracts::{
    ContractEvent, ContractFunction, ContractHandler, CustomRawDecoder, Erc20ContractService,
    Erc20Service, EvmContractHandler, IERC20,
};
pub use types::{EvmCallRequest, EvmError, EvmTransactionRequest, FunctionMessage};
