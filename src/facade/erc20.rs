use crate::error::Error;
use crate::evm::client::EvmClient;
use crate::evm::contracts::erc20::IERC20::{
    allowanceCall, allowedCall, approveCall, balanceOfCall, balancesCall, decimalsCall,
    nameCall, symbolCall, totalSupplyCall, transferCall, transferFromCall, Approval, Transfer,
};
use crate::evm::contracts::{ContractEvent, Erc20ContractService, Erc20Service};
use crate::evm::types::FunctionMessage;
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types_eth::{BlockId, TransactionReceipt};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Substitutable facade over an [`Erc20ContractService`].
///
/// Every operation forwards to the wrapped service with the same arguments and returns its
/// result, or its error, unchanged.
pub struct Erc20ContractFacade<S> {
    service: Arc<S>,
}

impl<S: Erc20ContractService> Erc20ContractFacade<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// The wrapped service
    pub fn inner(&self) -> &Arc<S> {
        &self.service
    }
}

impl Erc20ContractFacade<Erc20Service> {
    /// Facade over the alloy-backed service for the token at `address`
    pub fn at(client: &EvmClient, address: Address) -> Self {
        Self::new(Arc::new(client.erc20(address)))
    }
}

impl<S> Clone for Erc20ContractFacade<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

#[async_trait]
impl<S: Erc20ContractService> Erc20ContractService for Erc20ContractFacade<S> {
    type Handler = S::Handler;

    fn contract_address(&self) -> Address {
        self.service.contract_address()
    }

    fn contract_handler(&self) -> &S::Handler {
        self.service.contract_handler()
    }

    fn get_approval_event(&self) -> ContractEvent<Approval> {
        self.service.get_approval_event()
    }

    fn get_transfer_event(&self) -> ContractEvent<Transfer> {
        self.service.get_transfer_event()
    }

    async fn name_query(
        &self,
        message: Option<FunctionMessage<nameCall>>,
        block: Option<BlockId>,
    ) -> Result<String, Error> {
        self.service.name_query(message, block).await
    }

    async fn symbol_query(
        &self,
        message: Option<FunctionMessage<symbolCall>>,
        block: Option<BlockId>,
    ) -> Result<String, Error> {
        self.service.symbol_query(message, block).await
    }

    async fn approve_request_message(
        &self,
        message: FunctionMessage<approveCall>,
    ) -> Result<B256, Error> {
        self.service.approve_request_message(message).await
    }

    async fn approve_request(&self, spender: Address, value: U256) -> Result<B256, Error> {
        self.service.approve_request(spender, value).await
    }

    async fn approve_request_and_wait_for_receipt_message(
        &self,
        message: FunctionMessage<approveCall>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        self.service
            .approve_request_and_wait_for_receipt_message(message, cancellation)
            .await
    }

    async fn approve_request_and_wait_for_receipt(
        &self,
        spender: Address,
        value: U256,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        self.service
            .approve_request_and_wait_for_receipt(spender, value, cancellation)
            .await
    }

    async fn total_supply_query_message(
        &self,
        message: FunctionMessage<totalSupplyCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service.total_supply_query_message(message, block).await
    }

    async fn total_supply_query(&self, block: Option<BlockId>) -> Result<U256, Error> {
        self.service.total_supply_query(block).await
    }

    async fn transfer_from_request_message(
        &self,
        message: FunctionMessage<transferFromCall>,
    ) -> Result<B256, Error> {
        self.service.transfer_from_request_message(message).await
    }

    async fn transfer_from_request(
        &self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<B256, Error> {
        self.service.transfer_from_request(from, to, value).await
    }

    async fn transfer_from_request_and_wait_for_receipt_message(
        &self,
        message: FunctionMessage<transferFromCall>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        self.service
            .transfer_from_request_and_wait_for_receipt_message(message, cancellation)
            .await
    }

    async fn transfer_from_request_and_wait_for_receipt(
        &self,
        from: Address,
        to: Address,
        value: U256,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        self.service
            .transfer_from_request_and_wait_for_receipt(from, to, value, cancellation)
            .await
    }

    async fn get_balance_from_storage(
        &self,
        address: Address,
        slot: U256,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service
            .get_balance_from_storage(address, slot, block)
            .await
    }

    async fn balances_query_message(
        &self,
        message: FunctionMessage<balancesCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service.balances_query_message(message, block).await
    }

    async fn balances_query(
        &self,
        address: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service.balances_query(address, block).await
    }

    async fn decimals_query_message(
        &self,
        message: FunctionMessage<decimalsCall>,
        block: Option<BlockId>,
    ) -> Result<u8, Error> {
        self.service.decimals_query_message(message, block).await
    }

    async fn decimals_query(&self, block: Option<BlockId>) -> Result<u8, Error> {
        self.service.decimals_query(block).await
    }

    async fn allowed_query_message(
        &self,
        message: FunctionMessage<allowedCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service.allowed_query_message(message, block).await
    }

    async fn allowed_query(
        &self,
        owner: Address,
        spender: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service.allowed_query(owner, spender, block).await
    }

    async fn balance_of_query_message(
        &self,
        message: FunctionMessage<balanceOfCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service.balance_of_query_message(message, block).await
    }

    async fn balance_of_query(
        &self,
        owner: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service.balance_of_query(owner, block).await
    }

    async fn transfer_request_message(
        &self,
        message: FunctionMessage<transferCall>,
    ) -> Result<B256, Error> {
        self.service.transfer_request_message(message).await
    }

    async fn transfer_request(&self, to: Address, value: U256) -> Result<B256, Error> {
        self.service.transfer_request(to, value).await
    }

    async fn transfer_request_and_wait_for_receipt_message(
        &self,
        message: FunctionMessage<transferCall>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        self.service
            .transfer_request_and_wait_for_receipt_message(message, cancellation)
            .await
    }

    async fn transfer_request_and_wait_for_receipt(
        &self,
        to: Address,
        value: U256,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        self.service
            .transfer_request_and_wait_for_receipt(to, value, cancellation)
            .await
    }

    async fn allowance_query_message(
        &self,
        message: FunctionMessage<allowanceCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service.allowance_query_message(message, block).await
    }

    async fn allowance_query(
        &self,
        owner: Address,
        spender: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.service.allowance_query(owner, spender, block).await
    }
}
