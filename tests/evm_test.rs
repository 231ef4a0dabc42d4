/// Unit tests for the EVM request types and the alloy-backed services

mod tests {
    use alloy_primitives::{address, Address, Bytes, U256};
    use alloy_rpc_types_eth::BlockId;
    use alloy_sol_types::{SolCall, SolEvent};
    use contract_facade::evm::contracts::balance_storage_slot;
    use contract_facade::evm::contracts::IERC20::{approveCall, balanceOfCall, Approval};
    use contract_facade::evm::types::{EvmCallRequest, EvmError, EvmTransactionRequest};
    use contract_facade::{
        ContractHandler, ContractHandlerFacade, Erc20ContractFacade, Erc20ContractService,
        EvmClient, EvmConfig, FunctionMessage,
    };
    use std::str::FromStr;
    use std::time::Duration;

    const TOKEN: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

    #[test]
    fn test_evm_call_request_creation() {
        let data = vec![0x01, 0x02, 0x03, 0x04];

        let request = EvmCallRequest::new(TOKEN, data.clone());
        assert_eq!(request.to, TOKEN);
        assert_eq!(request.data, Bytes::from(data));
        assert!(request.block.is_none());
        assert!(request.from.is_none());

        let request_with_block = request.at_block(Some(BlockId::latest()));
        assert_eq!(request_with_block.block, Some(BlockId::latest()));
    }

    #[test]
    fn test_evm_transaction_request_creation() {
        let chain_id = 1;
        let mut request = EvmTransactionRequest::new(chain_id);

        assert_eq!(request.chain_id, chain_id);
        assert!(request.to.is_none());
        assert_eq!(request.value, U256::ZERO);
        assert!(request.data.is_empty());

        let value = U256::from(1000000u64);
        request = request
            .to(TOKEN)
            .value(value)
            .gas_limit(90_000)
            .data(vec![0x01, 0x02, 0x03]);

        assert_eq!(request.to, Some(TOKEN));
        assert_eq!(request.value, value);
        assert_eq!(request.gas_limit, Some(90_000));
        assert_eq!(request.data, Bytes::from(vec![0x01, 0x02, 0x03]));
    }

    #[test]
    fn test_function_message_into_transaction_request() {
        let owner = Address::from_str("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").unwrap();
        let message = FunctionMessage::new(approveCall {
            spender: TOKEN,
            amount: U256::from(5u64),
        })
        .from(owner)
        .nonce(3)
        .eip1559_fees(30_000_000_000, 1_000_000_000);

        let request = message.clone().into_transaction_request(TOKEN, 5);
        assert_eq!(request.from, Some(owner));
        assert_eq!(request.to, Some(TOKEN));
        assert_eq!(request.nonce, Some(3));
        assert_eq!(request.max_fee_per_gas, Some(30_000_000_000));
        assert_eq!(request.chain_id, 5);
        assert_eq!(&request.data[..4], &approveCall::SELECTOR);
        assert_eq!(request.data, message.encode());
    }

    #[test]
    fn test_rpc_message_classification() {
        assert!(matches!(
            EvmError::from_rpc_message("execution reverted: paused"),
            EvmError::TransactionReverted(_)
        ));
        assert!(matches!(
            EvmError::from_rpc_message("connection refused"),
            EvmError::RpcError(_)
        ));
    }

    #[test]
    fn test_balance_storage_slot_is_deterministic() {
        let holder = address!("00000000000000000000000000000000000000a1");
        let slot_zero = balance_storage_slot(holder, U256::ZERO);
        assert_eq!(slot_zero, balance_storage_slot(holder, U256::ZERO));
        assert_ne!(slot_zero, balance_storage_slot(holder, U256::from(1u64)));
        assert_ne!(slot_zero, balance_storage_slot(TOKEN, U256::ZERO));
    }

    #[test]
    fn test_evm_client_from_config() {
        let config = EvmConfig {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337,
            from_address: Some("0x742d35Cc6634C0532925a3b844Bc454e4438f44e".to_string()),
            receipt_poll_interval_ms: 200,
        };

        let client = EvmClient::from_config(&config).unwrap();
        assert_eq!(client.chain_id(), 31337);
        assert_eq!(client.default_from(), config.from_address().unwrap());
        assert_eq!(client.receipt_poll_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_evm_client_rejects_bad_url() {
        let result = EvmClient::new("not a url", 1);
        assert!(matches!(result, Err(contract_facade::Error::Config(_))));
    }

    #[test]
    fn test_facades_bind_to_the_same_contract() {
        let client = EvmClient::new("http://127.0.0.1:9", 1).unwrap();
        let token = Erc20ContractFacade::at(&client, TOKEN);
        let handler = ContractHandlerFacade::at(&client, TOKEN);

        assert_eq!(token.contract_address(), handler.contract_address());
        assert_eq!(
            token.get_approval_event(),
            handler.get_event::<Approval>()
        );
        assert_eq!(
            handler.get_function::<balanceOfCall>().signature(),
            "balanceOf(address)"
        );
        assert_eq!(
            token.get_approval_event().topic0(),
            Approval::SIGNATURE_HASH
        );
        assert_eq!(handler.eth_api_contract_service().chain_id(), 1);
    }
}
