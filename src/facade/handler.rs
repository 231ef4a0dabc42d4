use crate::error::Error;
use crate::evm::client::EvmClient;
use crate::evm::contracts::{
    ContractEvent, ContractFunction, ContractHandler, CustomRawDecoder, EvmContractHandler,
};
use crate::evm::types::FunctionMessage;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rpc_types_eth::{BlockId, TransactionReceipt};
use alloy_sol_types::{SolCall, SolEvent, SolType};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Substitutable facade over a [`ContractHandler`]; a generic pass-through for every
/// operation, including the caller's choice of message, return and decoder types.
pub struct ContractHandlerFacade<H> {
    handler: Arc<H>,
}

impl<H: ContractHandler> ContractHandlerFacade<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// The wrapped handler
    pub fn inner(&self) -> &Arc<H> {
        &self.handler
    }
}

impl ContractHandlerFacade<EvmContractHandler> {
    /// Facade over the alloy-backed handler for the contract at `address`
    pub fn at(client: &EvmClient, address: Address) -> Self {
        Self::new(Arc::new(client.contract_handler(address)))
    }
}

impl<H> Clone for ContractHandlerFacade<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

#[async_trait]
impl<H: ContractHandler> ContractHandler for ContractHandlerFacade<H> {
    type Api = H::Api;

    fn contract_address(&self) -> Address {
        self.handler.contract_address()
    }

    fn eth_api_contract_service(&self) -> &H::Api {
        self.handler.eth_api_contract_service()
    }

    fn get_event<E: SolEvent>(&self) -> ContractEvent<E> {
        self.handler.get_event::<E>()
    }

    fn get_function<F: SolCall>(&self) -> ContractFunction<F> {
        self.handler.get_function::<F>()
    }

    async fn send_request_and_wait_for_receipt<F>(
        &self,
        message: Option<FunctionMessage<F>>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        self.handler
            .send_request_and_wait_for_receipt(message, cancellation)
            .await
    }

    async fn send_request<F>(&self, message: Option<FunctionMessage<F>>) -> Result<B256, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        self.handler.send_request(message).await
    }

    async fn sign_transaction<F>(&self, message: Option<FunctionMessage<F>>) -> Result<Bytes, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        self.handler.sign_transaction(message).await
    }

    async fn estimate_gas<F>(&self, message: Option<FunctionMessage<F>>) -> Result<U256, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        self.handler.estimate_gas(message).await
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
        self.handler
            .query_deserializing_to_object(message, block)
            .await
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
        self.handler.query::<F, T>(message, block).await
    }

    async fn query_raw<F>(
        &self,
        message: Option<FunctionMessage<F>>,
        block: Option<BlockId>,
    ) -> Result<Bytes, Error>
    where
        F: SolCall + Default + Send + Sync + 'static,
    {
        self.handler.query_raw(message, block).await
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
        self.handler
            .query_raw_with_decoder::<F, D, R>(message, block)
            .await
    }
}
