/// Generic contract handler
///
/// `ContractHandler` is the operation set for arbitrary contracts: typed function and event
/// lookup, sending, signing, gas estimation and read-only queries decoded to a typed object,
/// a single typed value, raw bytes or through a caller-supplied decoder.
/// `EvmContractHandler` implements it over an [`EvmClient`].
use crate::error::Error;
use crate::evm::client::EvmClient;
use crate::evm::types::{EvmCallRequest, EvmError, EvmTransactionRequest, FunctionMessage};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rpc_types_eth::{BlockId, BlockNumberOrTag, Filter, Log, TransactionReceipt};
use alloy_sol_types::{SolCall, SolEvent, SolType};
use async_trait::async_trait;
use std::fmt;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;

/// Interprets the raw bytes returned by a contract call
pub trait CustomRawDecoder<R>: Default + Send + Sync {
    fn decode(&self, output: &[u8]) -> Result<R, Error>;
}

/// Typed handle to a contract function
pub struct ContractFunction<F> {
    address: Address,
    _call: PhantomData<fn() -> F>,
}

impl<F: SolCall> ContractFunction<F> {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            _call: PhantomData,
        }
    }

    /// Contract the function belongs to
    pub fn address(&self) -> Address {
        self.address
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> &'static str {
        F::SIGNATURE
    }

    /// Four-byte selector
    pub fn selector(&self) -> [u8; 4] {
        F::SELECTOR
    }

    /// Encode call data for `call`
    pub fn encode_input(&self, call: &F) -> Bytes {
        call.abi_encode().into()
    }

    /// Decode the call's return data
    pub fn decode_output(&self, output: &[u8]) -> Result<F::Return, Error> {
        F::abi_decode_returns(output, true).map_err(|e| EvmError::from(e).into())
    }
}

impl<F> Clone for ContractFunction<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for ContractFunction<F> {}

impl<F> PartialEq for ContractFunction<F> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<F: SolCall> fmt::Debug for ContractFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractFunction")
            .field("address", &self.address)
            .field("signature", &F::SIGNATURE)
            .finish()
    }
}

/// Typed handle to a contract event
pub struct ContractEvent<E> {
    address: Address,
    _event: PhantomData<fn() -> E>,
}

impl<E: SolEvent> ContractEvent<E> {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            _event: PhantomData,
        }
    }

    /// Contract emitting the event
    pub fn address(&self) -> Address {
        self.address
    }

    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> &'static str {
        E::SIGNATURE
    }

    /// First log topic identifying the event
    pub fn topic0(&self) -> B256 {
        E::SIGNATURE_HASH
    }

    /// Log filter for this event on this contract over a block range
    pub fn filter(
        &self,
        from_block: Option<BlockNumberOrTag>,
        to_block: Option<BlockNumberOrTag>,
    ) -> Filter {
        let mut filter = Filter::new()
            .address(self.address)
            .event_signature(E::SIGNATURE_HASH);
        if let Some(from) = from_block {
            filter = filter.from_block(from);
        }
        if let Some(to) = to_block {
            filter = filter.to_block(to);
        }
        filter
    }

    /// Decode a single log emitted by this event
    pub fn decode_log(&self, log: &Log) -> Result<E, Error> {
        let data = &log.inner.data;
        E::decode_raw_log(data.topics().iter().copied(), &data.data, true)
            .map_err(|e| EvmError::from(e).into())
    }

    /// Decode every log matching this event and contract, skipping the rest
    pub fn decode_logs(&self, logs: &[Log]) -> Result<Vec<E>, Error> {
        logs.iter()
            .filter(|log| {
                log.inner.address == self.address
                    && log.inner.data.topics().first() == Some(&E::SIGNATURE_HASH)
            })
            .map(|log| self.decode_log(log))
            .collect()
    }
}

impl<E> Clone for ContractEvent<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ContractEvent<E> {}

impl<E> PartialEq for ContractEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<E: SolEvent> fmt::Debug for ContractEvent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractEvent")
            .field("address", &self.address)
            .field("signature", &E::SIGNATURE)
            .finish()
    }
}

/// Operation set for interacting with an arbitrary contract.
///
/// A `None` message means `F::default()`, a `None` block means latest and a `None`
/// cancellation token never fires.
#[async_trait]
pub trait ContractHandler: Send + Sync {
    /// RPC service the handler talks through
    type Api: Send + Sync;

    fn contract_address(&self) -> Address;

    fn eth_api_contract_service(&self) -> &Self::Api;

    fn get_event<E: SolEvent>(&self) -> ContractEvent<E>;

    fn get_function<F: SolCall>(&self) -> ContractFunction<F>;

    /// Submit the transaction, then wait for its receipt
    async fn send_request_and_wait_for_receipt<F>(
        &self,
        message: Option<FunctionMessage<F>>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error>
    where
        F: SolCall + Default + Send + Sync + 'static;

    /// Submit the transaction and return its hash
    async fn send_request<F>(&self, message: Option<FunctionMessage<F>>) -> Result<B256, Error>
    where
        F: SolCall + Default + Send + Sync + 'static;

    /// Sign the transaction without broadcasting it
    async fn sign_transaction<F>(&self, message: Option<FunctionMessage<F>>) -> Result<Bytes, Error>
    where
        F: SolCall + Default + Send + Sync + 'static;

    async fn estimate_gas<F>(&self, message: Option<FunctionMessage<F>>) -> Result<U256, Error>
    where
        F: SolCall + Default + Send + Sync + 'static;

    /// Query and decode the full output of `F`
    async fn query_deserializing_to_object<F>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> Result<F::Return, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
        F::Return: Send;

    /// Query and decode the output as a single value of ABI type `T`
    async fn query<F, T>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> Result<T::RustType, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
        T: SolType + Send + 'static,
        T::RustType: Send;

    /// Query and return the undecoded output
    async fn query_raw<F>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> Result<Bytes, Error>
    where
        F: SolCall + Default + Send + Sync + 'static;

    /// Query and decode the output with `D`
    async fn query_raw_with_decoder<F, D, R>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> Result<R, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
        D: CustomRawDecoder<R> + 'static,
        R: Send + 'static;
}

/// Contract handler backed by an [`EvmClient`]
#[derive(Clone)]
pub struct EvmContractHandler {
    client: EvmClient,
    address: Address,
}

impl EvmContractHandler {
    pub fn new(client: EvmClient, address: Address) -> Self {
        Self { client, address }
    }

    /// Get the contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the client
    pub fn client(&self) -> &EvmClient {
        &self.client
    }

    /// Fetch and decode every `E` emitted by this contract in a block range
    pub async fn get_all_events<E: SolEvent>(
        &self,
        from_block: Option<BlockNumberOrTag>,
        to_block: Option<BlockNumberOrTag>,
    ) -> Result<Vec<E>, Error> {
        let event = self.get_event::<E>();
        let logs = self
            .client
            .get_logs(&event.filter(from_block, to_block))
            .await?;
        event.decode_logs(&logs)
    }

    fn transaction_request<F: SolCall + Default>(
        &self,
        message: Option<FunctionMessage<F>>,
    ) -> EvmTransactionRequest {
        let mut request = message
            .unwrap_or_default()
            .into_transaction_request(self.address, self.client.chain_id());
        request.from = request.from.or(self.client.default_from());
        request
    }

    fn call_request<F: SolCall + Default>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> EvmCallRequest {
        let mut request = message
            .unwrap_or_default()
            .into_call_request(self.address)
            .at_block(block);
        request.from = request.from.or(self.client.default_from());
        request
    }
}

#[async_trait]
impl ContractHandler for EvmContractHandler {
    type Api = EvmClient;

    fn contract_address(&self) -> Address {
        self.address
    }

    fn eth_api_contract_service(&self) -> &EvmClient {
        &self.client
    }

    fn get_event<E: SolEvent>(&self) -> ContractEvent<E> {
        ContractEvent::new(self.address)
    }

    fn get_function<F: SolCall>(&self) -> ContractFunction<F> {
        ContractFunction::new(self.address)
    }

    async fn send_request_and_wait_for_receipt<F>(
        &self,
        message: Option<FunctionMessage<F>>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        // The token governs the wait only; submission is never skipped.
        let tx_hash = self.send_request(message).await?;
        let cancellation = cancellation.unwrap_or_else(CancellationToken::new);
        self.client.wait_for_receipt(tx_hash, &cancellation).await
    }

    async fn send_request<F>(&self, message: Option<FunctionMessage<F>>) -> Result<B256, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        let request = self.transaction_request(message);
        self.client.send_transaction(request).await
    }

    async fn sign_transaction<F>(&self, message: Option<FunctionMessage<F>>) -> Result<Bytes, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        let request = self.transaction_request(message);
        self.client.sign_transaction(request).await
    }

    async fn estimate_gas<F>(&self, message: Option<FunctionMessage<F>>) -> Result<U256, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        let request = self.transaction_request(message);
        self.client.estimate_gas(request).await
    }

    async fn query_deserializing_to_object<F>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> Result<F::Return, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
        F::Return: Send,
    {
        let output = self.query_raw(message, block).await?;
        self.get_function::<F>().decode_output(&output)
    }

    async fn query<F, T>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> Result<T::RustType, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
        T: SolType + Send + 'static,
        T::RustType: Send,
    {
        let output = self.query_raw(message, block).await?;
        T::abi_decode(&output, true).map_err(|e| EvmError::from(e).into())
    }

    async fn query_raw<F>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> Result<Bytes, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        let request = self.call_request(message, block);
        self.client.call(request).await
    }

    async fn query_raw_with_decoder<F, D, R>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> Result<R, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
        D: CustomRawDecoder<R> + 'static,
        R: Send + 'static,
    {
        let output = self.query_raw(message, block).await?;
        D::default().decode(&output)
    }
}
