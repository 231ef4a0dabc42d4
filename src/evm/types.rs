/// Request and message types shared by the EVM client, the contract services and the facades.
use alloy_primitives::{Address, Bytes, U256};
use alloy_rpc_types_eth::{BlockId, TransactionInput, TransactionRequest};
use alloy_sol_types::SolCall;

/// A typed contract call together with the optional transaction fields sent with it.
///
/// `FunctionMessage::default()` is a default-constructed call with no overrides; every
/// operation that takes an `Option<FunctionMessage<C>>` treats `None` that way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionMessage<C> {
    /// ABI call payload
    pub call: C,
    /// Sending account; falls back to the client's default account
    pub from: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Wei attached to the call
    pub value: U256,
    /// Explicit nonce
    pub nonce: Option<u64>,
    /// Maximum fee per gas (EIP-1559)
    pub max_fee_per_gas: Option<u128>,
    /// Maximum priority fee per gas (EIP-1559)
    pub max_priority_fee_per_gas: Option<u128>,
}

impl<C: SolCall> FunctionMessage<C> {
    /// Wrap a call with no transaction overrides
    pub fn new(call: C) -> Self {
        Self {
            call,
            from: None,
            gas: None,
            value: U256::ZERO,
            nonce: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
        }
    }

    /// Set the sending account
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the gas limit
    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    /// Set the attached value
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Set the nonce
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Set EIP-1559 fees
    pub fn eip1559_fees(mut self, max_fee: u128, priority_fee: u128) -> Self {
        self.max_fee_per_gas = Some(max_fee);
        self.max_priority_fee_per_gas = Some(priority_fee);
        self
    }

    /// ABI-encoded call data (selector followed by arguments)
    pub fn encode(&self) -> Bytes {
        self.call.abi_encode().into()
    }

    /// Build a read-only call against `to`
    pub fn into_call_request(self, to: Address) -> EvmCallRequest {
        let data = self.encode();
        EvmCallRequest {
            to,
            data,
            from: self.from,
            value: self.value,
            gas: self.gas,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            block: None,
        }
    }

    /// Build a state-changing transaction against `to`
    pub fn into_transaction_request(self, to: Address, chain_id: u64) -> EvmTransactionRequest {
        let data = self.encode();
        EvmTransactionRequest {
            from: self.from,
            to: Some(to),
            value: self.value,
            gas_limit: self.gas,
            nonce: self.nonce,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            data,
            chain_id,
        }
    }
}

impl<C: SolCall> From<C> for FunctionMessage<C> {
    fn from(call: C) -> Self {
        Self::new(call)
    }
}

/// EVM request for read-only calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmCallRequest {
    /// Target contract address
    pub to: Address,
    /// Call data (encoded function call)
    pub data: Bytes,
    /// Caller seen by the contract
    pub from: Option<Address>,
    /// Wei attached to the simulated call
    pub value: U256,
    /// Gas limit for the simulated call
    pub gas: Option<u64>,
    /// Maximum fee per gas (EIP-1559)
    pub max_fee_per_gas: Option<u128>,
    /// Maximum priority fee per gas (EIP-1559)
    pub max_priority_fee_per_gas: Option<u128>,
    /// Block to execute against; latest when unset
    pub block: Option<BlockId>,
}

impl EvmCallRequest {
    /// Create a new call request
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
            from: None,
            value: U256::ZERO,
            gas: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            block: None,
        }
    }

    /// Set the block parameter
    pub fn at_block(mut self, block: Option<BlockId>) -> Self {
        self.block = block;
        self
    }

    /// Set the caller
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the attached value
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Set the gas limit
    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    // A zero value is left off the wire so plain reads stay plain.
    pub(crate) fn to_alloy(&self) -> TransactionRequest {
        TransactionRequest {
            from: self.from,
            to: Some(alloy_primitives::TxKind::Call(self.to)),
            value: (!self.value.is_zero()).then_some(self.value),
            gas: self.gas,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            input: TransactionInput::new(self.data.clone()),
            ..Default::default()
        }
    }
}

/// EVM transaction request for state-changing operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmTransactionRequest {
    /// Sending account (node-managed)
    pub from: Option<Address>,
    /// Target address (contract or EOA)
    pub to: Option<Address>,
    /// Transaction value in wei
    pub value: U256,
    /// Gas limit
    pub gas_limit: Option<u64>,
    /// Explicit nonce
    pub nonce: Option<u64>,
    /// Maximum fee per gas (EIP-1559)
    pub max_fee_per_gas: Option<u128>,
    /// Maximum priority fee per gas (EIP-1559)
    pub max_priority_fee_per_gas: Option<u128>,
    /// Transaction data
    pub data: Bytes,
    /// Chain ID for EIP-155 replay protection
    pub chain_id: u64,
}

impl EvmTransactionRequest {
    /// Create a new transaction request
    pub fn new(chain_id: u64) -> Self {
        Self {
            from: None,
            to: None,
            value: U256::ZERO,
            gas_limit: None,
            nonce: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            data: Bytes::new(),
            chain_id,
        }
    }

    /// Set the sending account
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the target address
    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Set the transaction value
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Set the gas limit
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Set EIP-1559 fees
    pub fn eip1559_fees(mut self, max_fee: u128, priority_fee: u128) -> Self {
        self.max_fee_per_gas = Some(max_fee);
        self.max_priority_fee_per_gas = Some(priority_fee);
        self
    }

    /// Set transaction data
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    pub(crate) fn to_alloy(&self) -> TransactionRequest {
        TransactionRequest {
            from: self.from,
            to: self.to.map(alloy_primitives::TxKind::Call),
            value: Some(self.value),
            gas: self.gas_limit,
            nonce: self.nonce,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            chain_id: Some(self.chain_id),
            input: TransactionInput::new(self.data.clone()),
            ..Default::default()
        }
    }
}

/// EVM-specific errors
#[derive(Debug, thiserror::Error)]
pub enum EvmError {
    #[error("Invalid Ethereum address: {0}")]
    InvalidAddress(String),

    #[error("ABI encoding/decoding error: {0}")]
    AbiError(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Gas estimation failed: {0}")]
    GasEstimationError(String),

    #[error("Transaction reverted: {0}")]
    TransactionReverted(String),
}

impl EvmError {
    /// Classify a node-side failure message; reverts get their own kind
    pub fn from_rpc_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.to_ascii_lowercase().contains("revert") {
            EvmError::TransactionReverted(message)
        } else {
            EvmError::RpcError(message)
        }
    }
}

impl From<alloy_sol_types::Error> for EvmError {
    fn from(err: alloy_sol_types::Error) -> Self {
        EvmError::AbiError(err.to_string())
    }
}
