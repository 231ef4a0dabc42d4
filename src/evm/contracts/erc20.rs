/// ERC-20 token contract service
///
/// `Erc20ContractService` is the token-standard operation set. Most operations come in two
/// forms: a `_message` form taking the full [`FunctionMessage`] and an argument form that
/// builds the message from plain arguments.
use crate::error::Error;
use crate::evm::contracts::handler::{ContractEvent, ContractHandler, EvmContractHandler};
use crate::evm::types::FunctionMessage;
use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_rpc_types_eth::{BlockId, TransactionReceipt};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// ERC-20 ABI, including the legacy `balances` and `allowed` mapping getters
#[allow(non_snake_case)]
pub mod IERC20 {
    alloy_sol_types::sol! {
        #[derive(Debug, Default, PartialEq, Eq)]
        function name() external view returns (string);
        #[derive(Debug, Default, PartialEq, Eq)]
        function symbol() external view returns (string);
        #[derive(Debug, Default, PartialEq, Eq)]
        function decimals() external view returns (uint8);
        #[derive(Debug, Default, PartialEq, Eq)]
        function totalSupply() external view returns (uint256);
        #[derive(Debug, Default, PartialEq, Eq)]
        function balanceOf(address account) external view returns (uint256);
        #[derive(Debug, Default, PartialEq, Eq)]
        function balances(address account) external view returns (uint256);
        #[derive(Debug, Default, PartialEq, Eq)]
        function transfer(address to, uint256 amount) external returns (bool);
        #[derive(Debug, Default, PartialEq, Eq)]
        function allowance(address owner, address spender) external view returns (uint256);
        #[derive(Debug, Default, PartialEq, Eq)]
        function allowed(address owner, address spender) external view returns (uint256);
        #[derive(Debug, Default, PartialEq, Eq)]
        function approve(address spender, uint256 amount) external returns (bool);
        #[derive(Debug, Default, PartialEq, Eq)]
        function transferFrom(address from, address to, uint256 amount) external returns (bool);

        #[derive(Debug, Default, PartialEq, Eq)]
        event Transfer(address indexed from, address indexed to, uint256 value);
        #[derive(Debug, Default, PartialEq, Eq)]
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}

use IERC20::{
    allowanceCall, allowedCall, approveCall, balanceOfCall, balancesCall, decimalsCall,
    nameCall, symbolCall, totalSupplyCall, transferCall, transferFromCall, Approval, Transfer,
};

/// Storage slot of `holder`'s entry in a `mapping(address => uint256)` declared at `slot`
pub fn balance_storage_slot(holder: Address, slot: U256) -> U256 {
    let mut key = [0u8; 64];
    key[12..32].copy_from_slice(holder.as_slice());
    key[32..].copy_from_slice(&slot.to_be_bytes::<32>());
    U256::from_be_bytes(keccak256(key).0)
}

/// Token-standard operation set
#[async_trait]
pub trait Erc20ContractService: Send + Sync {
    /// Generic handler bound to the same contract
    type Handler: ContractHandler;

    fn contract_address(&self) -> Address;

    fn contract_handler(&self) -> &Self::Handler;

    fn get_approval_event(&self) -> ContractEvent<Approval>;

    fn get_transfer_event(&self) -> ContractEvent<Transfer>;

    async fn name_query(
        &self,
        message: Option<FunctionMessage<nameCall>>,
        block: Option<BlockId>,
    ) -> Result<String, Error>;

    async fn symbol_query(
        &self,
        message: Option<FunctionMessage<symbolCall>>,
        block: Option<BlockId>,
    ) -> Result<String, Error>;

    async fn approve_request_message(
        &self,
        message: FunctionMessage<approveCall>,
    ) -> Result<B256, Error>;

    async fn approve_request(&self, spender: Address, value: U256) -> Result<B256, Error>;

    async fn approve_request_and_wait_for_receipt_message(
        &self,
        message: FunctionMessage<approveCall>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error>;

    async fn approve_request_and_wait_for_receipt(
        &self,
        spender: Address,
        value: U256,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error>;

    async fn total_supply_query_message(
        &self,
        message: FunctionMessage<totalSupplyCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error>;

    async fn total_supply_query(&self, block: Option<BlockId>) -> Result<U256, Error>;

    async fn transfer_from_request_message(
        &self,
        message: FunctionMessage<transferFromCall>,
    ) -> Result<B256, Error>;

    async fn transfer_from_request(
        &self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<B256, Error>;

    async fn transfer_from_request_and_wait_for_receipt_message(
        &self,
        message: FunctionMessage<transferFromCall>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error>;

    async fn transfer_from_request_and_wait_for_receipt(
        &self,
        from: Address,
        to: Address,
        value: U256,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error>;

    /// Read a balance straight from the token's balance mapping at storage `slot`
    async fn get_balance_from_storage(
        &self,
        address: Address,
        slot: U256,
        block: Option<BlockId>,
    ) -> Result<U256, Error>;

    async fn balances_query_message(
        &self,
        message: FunctionMessage<balancesCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error>;

    async fn balances_query(&self, address: Address, block: Option<BlockId>)
        -> Result<U256, Error>;

    async fn decimals_query_message(
        &self,
        message: FunctionMessage<decimalsCall>,
        block: Option<BlockId>,
    ) -> Result<u8, Error>;

    async fn decimals_query(&self, block: Option<BlockId>) -> Result<u8, Error>;

    async fn allowed_query_message(
        &self,
        message: FunctionMessage<allowedCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error>;

    async fn allowed_query(
        &self,
        owner: Address,
        spender: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error>;

    async fn balance_of_query_message(
        &self,
        message: FunctionMessage<balanceOfCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error>;

    async fn balance_of_query(&self, owner: Address, block: Option<BlockId>)
        -> Result<U256, Error>;

    async fn transfer_request_message(
        &self,
        message: FunctionMessage<transferCall>,
    ) -> Result<B256, Error>;

    async fn transfer_request(&self, to: Address, value: U256) -> Result<B256, Error>;

    async fn transfer_request_and_wait_for_receipt_message(
        &self,
        message: FunctionMessage<transferCall>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error>;

    async fn transfer_request_and_wait_for_receipt(
        &self,
        to: Address,
        value: U256,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error>;

    async fn allowance_query_message(
        &self,
        message: FunctionMessage<allowanceCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error>;

    async fn allowance_query(
        &self,
        owner: Address,
        spender: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error>;
}

/// ERC-20 service backed by an [`EvmContractHandler`]
#[derive(Clone)]
pub struct Erc20Service {
    handler: EvmContractHandler,
}

impl Erc20Service {
    /// Create a new ERC-20 service over a handler bound to the token contract
    pub fn new(handler: EvmContractHandler) -> Self {
        Self { handler }
    }

    /// Get the contract address
    pub fn address(&self) -> Address {
        self.handler.address()
    }
}

#[async_trait]
impl Erc20ContractService for Erc20Service {
    type Handler = EvmContractHandler;

    fn contract_address(&self) -> Address {
        self.handler.address()
    }

    fn contract_handler(&self) -> &EvmContractHandler {
        &self.handler
    }

    fn get_approval_event(&self) -> ContractEvent<Approval> {
        self.handler.get_event()
    }

    fn get_transfer_event(&self) -> ContractEvent<Transfer> {
        self.handler.get_event()
    }

    async fn name_query(
        &self,
        message: Option<FunctionMessage<nameCall>>,
        block: Option<BlockId>,
    ) -> Result<String, Error> {
        let result = self
            .handler
            .query_deserializing_to_object(message, block)
            .await?;
        Ok(result._0)
    }

    async fn symbol_query(
        &self,
        message: Option<FunctionMessage<symbolCall>>,
        block: Option<BlockId>,
    ) -> Result<String, Error> {
        let result = self
            .handler
            .query_deserializing_to_object(message, block)
            .await?;
        Ok(result._0)
    }

    async fn approve_request_message(
        &self,
        message: FunctionMessage<approveCall>,
    ) -> Result<B256, Error> {
        self.handler.send_request(Some(message)).await
    }

    async fn approve_request(&self, spender: Address, value: U256) -> Result<B256, Error> {
        let call = approveCall {
            spender,
            amount: value,
        };
        self.approve_request_message(call.into()).await
    }

    async fn approve_request_and_wait_for_receipt_message(
        &self,
        message: FunctionMessage<approveCall>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        self.handler
            .send_request_and_wait_for_receipt(Some(message), cancellation)
            .await
    }

    async fn approve_request_and_wait_for_receipt(
        &self,
        spender: Address,
        value: U256,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        let call = approveCall {
            spender,
            amount: value,
        };
        self.approve_request_and_wait_for_receipt_message(call.into(), cancellation)
            .await
    }

    async fn total_supply_query_message(
        &self,
        message: FunctionMessage<totalSupplyCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        let result = self
            .handler
            .query_deserializing_to_object(Some(message), block)
            .await?;
        Ok(result._0)
    }

    async fn total_supply_query(&self, block: Option<BlockId>) -> Result<U256, Error> {
        self.total_supply_query_message(FunctionMessage::default(), block)
            .await
    }

    async fn transfer_from_request_message(
        &self,
        message: FunctionMessage<transferFromCall>,
    ) -> Result<B256, Error> {
        self.handler.send_request(Some(message)).await
    }

    async fn transfer_from_request(
        &self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<B256, Error> {
        let call = transferFromCall {
            from,
            to,
            amount: value,
        };
        self.transfer_from_request_message(call.into()).await
    }

    async fn transfer_from_request_and_wait_for_receipt_message(
        &self,
        message: FunctionMessage<transferFromCall>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        self.handler
            .send_request_and_wait_for_receipt(Some(message), cancellation)
            .await
    }

    async fn transfer_from_request_and_wait_for_receipt(
        &self,
        from: Address,
        to: Address,
        value: U256,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        let call = transferFromCall {
            from,
            to,
            amount: value,
        };
        self.transfer_from_request_and_wait_for_receipt_message(call.into(), cancellation)
            .await
    }

    async fn get_balance_from_storage(
        &self,
        address: Address,
        slot: U256,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        self.handler
            .client()
            .get_storage_at(self.address(), balance_storage_slot(address, slot), block)
            .await
    }

    async fn balances_query_message(
        &self,
        message: FunctionMessage<balancesCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        let result = self
            .handler
            .query_deserializing_to_object(Some(message), block)
            .await?;
        Ok(result._0)
    }

    async fn balances_query(
        &self,
        address: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        let call = balancesCall { account: address };
        self.balances_query_message(call.into(), block).await
    }

    async fn decimals_query_message(
        &self,
        message: FunctionMessage<decimalsCall>,
        block: Option<BlockId>,
    ) -> Result<u8, Error> {
        let result = self
            .handler
            .query_deserializing_to_object(Some(message), block)
            .await?;
        Ok(result._0)
    }

    async fn decimals_query(&self, block: Option<BlockId>) -> Result<u8, Error> {
        self.decimals_query_message(FunctionMessage::default(), block)
            .await
    }

    async fn allowed_query_message(
        &self,
        message: FunctionMessage<allowedCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        let result = self
            .handler
            .query_deserializing_to_object(Some(message), block)
            .await?;
        Ok(result._0)
    }

    async fn allowed_query(
        &self,
        owner: Address,
        spender: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        let call = allowedCall { owner, spender };
        self.allowed_query_message(call.into(), block).await
    }

    async fn balance_of_query_message(
        &self,
        message: FunctionMessage<balanceOfCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        let result = self
            .handler
            .query_deserializing_to_object(Some(message), block)
            .await?;
        Ok(result._0)
    }

    async fn balance_of_query(
        &self,
        owner: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        let call = balanceOfCall { account: owner };
        self.balance_of_query_message(call.into(), block).await
    }

    async fn transfer_request_message(
        &self,
        message: FunctionMessage<transferCall>,
    ) -> Result<B256, Error> {
        self.handler.send_request(Some(message)).await
    }

    async fn transfer_request(&self, to: Address, value: U256) -> Result<B256, Error> {
        let call = transferCall { to, amount: value };
        self.transfer_request_message(call.into()).await
    }

    async fn transfer_request_and_wait_for_receipt_message(
        &self,
        message: FunctionMessage<transferCall>,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        self.handler
            .send_request_and_wait_for_receipt(Some(message), cancellation)
            .await
    }

    async fn transfer_request_and_wait_for_receipt(
        &self,
        to: Address,
        value: U256,
        cancellation: Option<CancellationToken>,
    ) -> Result<TransactionReceipt, Error> {
        let call = transferCall { to, amount: value };
        self.transfer_request_and_wait_for_receipt_message(call.into(), cancellation)
            .await
    }

    async fn allowance_query_message(
        &self,
        message: FunctionMessage<allowanceCall>,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        let result = self
            .handler
            .query_deserializing_to_object(Some(message), block)
            .await?;
        Ok(result._0)
    }

    async fn allowance_query(
        &self,
        owner: Address,
        spender: Address,
        block: Option<BlockId>,
    ) -> Result<U256, Error> {
        let call = allowanceCall { owner, spender };
        self.allowance_query_message(call.into(), block).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_sol_types::{SolCall, SolEvent, SolValue};

    #[test]
    fn test_standard_selectors() {
        assert_eq!(hex::encode(nameCall::SELECTOR), "06fdde03");
        assert_eq!(hex::encode(symbolCall::SELECTOR), "95d89b41");
        assert_eq!(hex::encode(decimalsCall::SELECTOR), "313ce567");
        assert_eq!(hex::encode(totalSupplyCall::SELECTOR), "18160ddd");
        assert_eq!(hex::encode(balanceOfCall::SELECTOR), "70a08231");
        assert_eq!(hex::encode(transferCall::SELECTOR), "a9059cbb");
        assert_eq!(hex::encode(allowanceCall::SELECTOR), "dd62ed3e");
        assert_eq!(hex::encode(approveCall::SELECTOR), "095ea7b3");
        assert_eq!(hex::encode(transferFromCall::SELECTOR), "23b872dd");
    }

    #[test]
    fn test_event_topics() {
        assert_eq!(
            hex::encode(Transfer::SIGNATURE_HASH),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
        assert_eq!(
            hex::encode(Approval::SIGNATURE_HASH),
            "8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925"
        );
    }

    #[test]
    fn test_balance_storage_slot_matches_abi_encoding() {
        let holder = address!("742d35Cc6634C0532925a3b844Bc454e4438f44e");
        let slot = U256::from(3u64);

        let expected = U256::from_be_bytes(keccak256((holder, slot).abi_encode()).0);
        assert_eq!(balance_storage_slot(holder, slot), expected);
        assert_ne!(
            balance_storage_slot(holder, slot),
            balance_storage_slot(holder, U256::from(4u64))
        );
    }

    #[test]
    fn test_argument_form_builds_expected_message() {
        let spender = address!("00000000000000000000000000000000000000b0");
        let message: FunctionMessage<approveCall> = approveCall {
            spender,
            amount: U256::from(50u64),
        }
        .into();

        assert!(message.from.is_none());
        assert_eq!(&message.encode()[..4], &approveCall::SELECTOR);
        assert_eq!(message.encode().len(), 4 + 64);
    }
}
