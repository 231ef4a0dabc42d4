/// EVM Client
///
/// JSON-RPC access used by the alloy-backed contract services: read-only calls, gas
/// estimation, transaction submission and signing through node-managed accounts, storage
/// reads, receipt polling and log queries.
use crate::config::EvmConfig;
use crate::error::Error;
use crate::evm::contracts::{Erc20Service, EvmContractHandler};
use crate::evm::types::{EvmCallRequest, EvmError, EvmTransactionRequest};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types_eth::{BlockId, Filter, Log, TransactionReceipt};
use alloy_transport_http::{Client, Http};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default interval between `eth_getTransactionReceipt` polls
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// EVM Client for blockchain interactions
#[derive(Clone)]
pub struct EvmClient {
    /// Alloy provider for RPC communication
    provider: alloy_provider::RootProvider<Http<Client>>,
    /// Chain ID for transaction requests
    chain_id: u64,
    /// Account used when a message does not name a sender
    default_from: Option<Address>,
    /// Delay between receipt polls
    receipt_poll_interval: Duration,
}

impl EvmClient {
    /// Create a new EVM client with the given RPC endpoint and chain ID
    pub fn new(rpc_url: &str, chain_id: u64) -> Result<Self, Error> {
        let url = url::Url::parse(rpc_url)
            .map_err(|e| Error::Config(format!("Invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new().on_http(url);

        Ok(Self {
            provider,
            chain_id,
            default_from: None,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        })
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: &EvmConfig) -> Result<Self, Error> {
        config.validate()?;
        let mut client = Self::new(&config.rpc_url, config.chain_id)?
            .with_receipt_poll_interval(config.receipt_poll_interval());
        if let Some(from) = config.from_address()? {
            client = client.with_default_from(from);
        }
        Ok(client)
    }

    /// Set the account used when a message does not name a sender
    pub fn with_default_from(mut self, from: Address) -> Self {
        self.default_from = Some(from);
        self
    }

    /// Set the delay between receipt polls
    pub fn with_receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self
    }

    /// Get the chain ID
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Account used when a message does not name a sender
    pub fn default_from(&self) -> Option<Address> {
        self.default_from
    }

    /// Delay between receipt polls
    pub fn receipt_poll_interval(&self) -> Duration {
        self.receipt_poll_interval
    }

    /// Underlying alloy provider
    pub fn provider(&self) -> &alloy_provider::RootProvider<Http<Client>> {
        &self.provider
    }

    /// Execute a read-only contract call
    pub async fn call(&self, request: EvmCallRequest) -> Result<Bytes, Error> {
        debug!("eth_call to {} at {:?}", request.to, request.block);
        let tx_request = request.to_alloy();
        let block = request.block.unwrap_or_else(BlockId::latest);

        let result = self
            .provider
            .call(&tx_request)
            .block(block)
            .await
            .map_err(|e| EvmError::from_rpc_message(e.to_string()))?;

        Ok(result)
    }

    /// Estimate gas for a transaction
    pub async fn estimate_gas(&self, request: EvmTransactionRequest) -> Result<U256, Error> {
        debug!("eth_estimateGas to {:?}", request.to);
        let tx_request = request.to_alloy();

        let gas = self
            .provider
            .estimate_gas(&tx_request)
            .await
            .map_err(|e| match EvmError::from_rpc_message(e.to_string()) {
                EvmError::RpcError(message) => EvmError::GasEstimationError(message),
                reverted => reverted,
            })?;

        Ok(U256::from(gas))
    }

    /// Submit a transaction signed by a node-managed account
    pub async fn send_transaction(&self, request: EvmTransactionRequest) -> Result<B256, Error> {
        debug!(
            "eth_sendTransaction from {:?} to {:?}",
            request.from, request.to
        );
        let tx_request = request.to_alloy();

        let pending = self
            .provider
            .send_transaction(tx_request)
            .await
            .map_err(|e| EvmError::from_rpc_message(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    /// Sign a transaction with a node-managed account without broadcasting it
    pub async fn sign_transaction(&self, request: EvmTransactionRequest) -> Result<Bytes, Error> {
        debug!("eth_signTransaction from {:?}", request.from);
        let tx_request = request.to_alloy();

        let signed: Bytes = self
            .provider
            .raw_request("eth_signTransaction".into(), (tx_request,))
            .await
            .map_err(|e| EvmError::from_rpc_message(e.to_string()))?;

        Ok(signed)
    }

    /// Get storage value at address and slot
    pub async fn get_storage_at(
        &self,
        address: Address,
        slot: U256,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        debug!("eth_getStorageAt {} slot {:#x}", address, slot);
        let storage = self
            .provider
            .get_storage_at(address, slot)
            .block_id(block.unwrap_or_else(BlockId::latest))
            .await
            .map_err(|e| EvmError::RpcError(e.to_string()))?;

        Ok(storage)
    }

    /// Get transaction receipt by hash
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: B256,
    ) -> Result<Option<TransactionReceipt>, Error> {
        debug!("eth_getTransactionReceipt {}", tx_hash);
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| EvmError::RpcError(e.to_string()))?;

        Ok(receipt)
    }

    /// Poll for the receipt of `tx_hash` until it is mined or `cancellation` fires.
    ///
    /// The first poll always runs; the token is checked after every pending poll.
    pub async fn wait_for_receipt(
        &self,
        tx_hash: B256,
        cancellation: &CancellationToken,
    ) -> Result<TransactionReceipt, Error> {
        loop {
            match self.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    debug!(
                        "Receipt for {} found in block {:?}",
                        tx_hash, receipt.block_number
                    );
                    return Ok(receipt);
                }
                Ok(None) => debug!("Receipt for {} not available yet", tx_hash),
                Err(e) => {
                    warn!("Receipt poll for {} failed: {}", tx_hash, e);
                    return Err(e);
                }
            }

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    return Err(Error::Cancelled(format!(
                        "waiting for receipt of {}",
                        tx_hash
                    )));
                }
                _ = tokio::time::sleep(self.receipt_poll_interval) => {}
            }
        }
    }

    /// Query event logs
    pub async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>, Error> {
        debug!("eth_getLogs {:?}", filter);
        let logs = self
            .provider
            .get_logs(filter)
            .await
            .map_err(|e| EvmError::RpcError(e.to_string()))?;

        Ok(logs)
    }

    /// Get the current block number
    pub async fn get_block_number(&self) -> Result<u64, Error> {
        debug!("eth_blockNumber");
        let block_number = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| EvmError::RpcError(e.to_string()))?;

        Ok(block_number)
    }

    /// Create a generic contract handler for the given contract address
    pub fn contract_handler(&self, address: Address) -> EvmContractHandler {
        EvmContractHandler::new(self.clone(), address)
    }

    /// Create an ERC-20 service for the given contract address
    pub fn erc20(&self, address: Address) -> Erc20Service {
        Erc20Service::new(self.contract_handler(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    // Nothing listens here; provider construction is lazy so no request is made.
    const UNREACHABLE_RPC: &str = "http://127.0.0.1:9";

    #[test]
    fn test_client_rejects_invalid_url() {
        let result = EvmClient::new("not a url", 1);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_client_builders() {
        let from = address!("00000000000000000000000000000000000000aa");
        let client = EvmClient::new(UNREACHABLE_RPC, 5)
            .unwrap()
            .with_default_from(from)
            .with_receipt_poll_interval(Duration::from_millis(10));

        assert_eq!(client.chain_id(), 5);
        assert_eq!(client.default_from(), Some(from));
        assert_eq!(client.receipt_poll_interval(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_wait_for_receipt_polls_before_checking_token() {
        let client = EvmClient::new(UNREACHABLE_RPC, 1).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        // The poll runs first, so the transport failure wins over the cancelled token.
        let result = client.wait_for_receipt(B256::ZERO, &token).await;
        assert!(matches!(result, Err(Error::Evm(EvmError::RpcError(_)))));
    }

    #[test]
    fn test_handlers_share_client_address() {
        let contract = address!("742d35Cc6634C0532925a3b844Bc454e4438f44e");
        let client = EvmClient::new(UNREACHABLE_RPC, 1).unwrap();
        assert_eq!(client.contract_handler(contract).address(), contract);
        assert_eq!(client.erc20(contract).address(), contract);
    }
}
