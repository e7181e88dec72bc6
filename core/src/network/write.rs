use ethers::abi::Token;
use ethers::providers::{JsonRpcClient, Middleware};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{BlockNumber, Eip1559TransactionRequest, TransactionReceipt, H256, U256, U64};
use tracing::{debug, info, warn};

use super::{classify_write_error, Confirmation, EthersClient};
use crate::error::{ClientError, Result};
use crate::signer::{SignRequest, Signer};

impl<P: JsonRpcClient> EthersClient<P> {
    /// Build, fill, sign and broadcast a contract call, then wait for its receipt.
    pub(super) async fn sign_and_send(
        &self,
        name: &str,
        args: &[Token],
        value: U256,
        signer: &dyn Signer,
    ) -> Result<Confirmation> {
        let function = self.function(name)?;
        let data = self.encode_call(function, args)?;
        let from = signer.address();

        let mut tx: TypedTransaction = Eip1559TransactionRequest::new()
            .from(from)
            .to(self.contract)
            .data(data)
            .value(value)
            .chain_id(self.chain.chain_id())
            .into();

        let nonce = self
            .provider
            .get_transaction_count(from, Some(BlockNumber::Pending.into()))
            .await
            .map_err(|e| ClientError::Connectivity(format!("Failed to fetch nonce: {e}")))?;
        tx.set_nonce(nonce);

        // Gas estimation runs the call, so a reverting transaction fails here.
        self.provider
            .fill_transaction(&mut tx, None)
            .await
            .map_err(classify_write_error)?;

        let request = SignRequest {
            from,
            to: self.contract,
            function: name.to_string(),
            args: args.to_vec(),
            value,
        };
        self.broadcast(&tx, &request, signer).await
    }

    /// Sign a filled transaction, send it and wait for inclusion.
    pub(super) async fn broadcast(
        &self,
        tx: &TypedTransaction,
        request: &SignRequest,
        signer: &dyn Signer,
    ) -> Result<Confirmation> {
        let signature = signer.sign_transaction(tx, request)?;
        let raw = tx.rlp_signed(&signature);

        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(classify_write_error)?;
        let tx_hash = *pending;
        info!(tx = %format!("{tx_hash:#x}"), function = %request.function, "transaction broadcast");

        let receipt = pending
            .await
            .map_err(|e| ClientError::Connectivity(format!("Lost track of transaction: {e}")))?;
        confirmation_from_receipt(tx_hash, receipt)
    }
}

fn confirmation_from_receipt(
    tx_hash: H256,
    receipt: Option<TransactionReceipt>,
) -> Result<Confirmation> {
    let receipt = receipt.ok_or_else(|| {
        ClientError::Connectivity(format!("Transaction {tx_hash:#x} was dropped"))
    })?;

    if receipt.status == Some(U64::zero()) {
        warn!(tx = %format!("{tx_hash:#x}"), "transaction reverted");
        return Err(ClientError::Reverted {
            reason: format!("Transaction {tx_hash:#x} reverted"),
        });
    }

    debug!(block = ?receipt.block_number, gas_used = ?receipt.gas_used, "transaction included");
    Ok(Confirmation {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number.map(|b| b.as_u64()),
        gas_used: receipt.gas_used,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{AppConfig, ConfigInput};
    use crate::network::{ChainClient, PAY};
    use crate::signer::SoftwareSigner;
    use ethers::providers::{JsonRpcError, MockProvider, MockResponse, Provider};
    use ethers::types::Transaction;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn nonce_lookup_failure_is_connectivity() {
        let (provider, _mock) = Provider::mocked();
        let config = AppConfig::resolve(ConfigInput::default(), false).unwrap();
        let client = EthersClient::with_provider(provider, &config).unwrap();
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 11_155_111).unwrap();

        let err = client
            .write(PAY, &[Token::String("gm".into())], U256::exp10(15), Some(&signer))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Connectivity(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn node_refusal_during_fill_is_reverted() {
        let (provider, mock) = Provider::mocked();
        // Responses are served last-in first-out.
        mock.push_response(MockResponse::Error(JsonRpcError {
            code: -32000,
            message: "insufficient funds for gas * price + value".into(),
            data: None,
        }));
        mock.push::<U256, _>(U256::from(7)).unwrap();

        let config = AppConfig::resolve(ConfigInput::default(), false).unwrap();
        let client = EthersClient::with_provider(provider, &config).unwrap();
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 11_155_111).unwrap();

        let err = client
            .write(PAY, &[Token::String("gm".into())], U256::exp10(15), Some(&signer))
            .await
            .unwrap_err();
        match err {
            ClientError::Reverted { reason } => assert!(reason.contains("insufficient funds")),
            other => panic!("expected ledger rejection, got {other:?}"),
        }
    }

    fn fast_client() -> (EthersClient<MockProvider>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        let provider = provider.interval(Duration::from_millis(5));
        let config = AppConfig::resolve(ConfigInput::default(), false).unwrap();
        (EthersClient::with_provider(provider, &config).unwrap(), mock)
    }

    fn filled(
        client: &EthersClient<MockProvider>,
        signer: &SoftwareSigner,
    ) -> (TypedTransaction, SignRequest) {
        let value = U256::exp10(15);
        let tx = Eip1559TransactionRequest::new()
            .from(signer.address())
            .to(client.contract_address())
            .value(value)
            .chain_id(11_155_111u64)
            .nonce(7u64)
            .gas(60_000u64)
            .max_fee_per_gas(2_000_000_000u64)
            .max_priority_fee_per_gas(1_000_000_000u64)
            .into();
        let request = SignRequest {
            from: signer.address(),
            to: client.contract_address(),
            function: PAY.to_string(),
            args: vec![Token::String("gm".into())],
            value,
        };
        (tx, request)
    }

    /// Queue replies for send, transaction lookup and receipt (served LIFO).
    fn queue_inclusion(mock: &MockProvider, tx_hash: H256, status: u64) {
        mock.push::<TransactionReceipt, _>(TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: Some(U64::from(42)),
            gas_used: Some(U256::from(50_000)),
            status: Some(U64::from(status)),
            ..Default::default()
        })
        .unwrap();
        mock.push::<Transaction, _>(Transaction {
            hash: tx_hash,
            block_number: Some(U64::from(42)),
            ..Default::default()
        })
        .unwrap();
        mock.push::<H256, _>(tx_hash).unwrap();
    }

    #[tokio::test]
    async fn included_transaction_yields_confirmation() {
        let (client, mock) = fast_client();
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 11_155_111).unwrap();
        let tx_hash = H256::repeat_byte(0xab);
        queue_inclusion(&mock, tx_hash, 1);

        let (tx, request) = filled(&client, &signer);
        let confirmation = client.broadcast(&tx, &request, &signer).await.unwrap();
        assert_eq!(confirmation.tx_hash, tx_hash);
        assert_eq!(confirmation.block_number, Some(42));
        assert_eq!(confirmation.gas_used, Some(U256::from(50_000)));
    }

    #[tokio::test]
    async fn failed_receipt_is_reverted_with_hash() {
        let (client, mock) = fast_client();
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 11_155_111).unwrap();
        let tx_hash = H256::repeat_byte(0xcd);
        queue_inclusion(&mock, tx_hash, 0);

        let (tx, request) = filled(&client, &signer);
        match client.broadcast(&tx, &request, &signer).await.unwrap_err() {
            ClientError::Reverted { reason } => {
                assert!(reason.contains(&format!("{tx_hash:#x}")), "{reason}")
            }
            other => panic!("expected revert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transaction_missing_from_mempool_is_dropped() {
        let (client, mock) = fast_client();
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 11_155_111).unwrap();
        let tx_hash = H256::repeat_byte(0xef);
        for _ in 0..10 {
            mock.push::<Option<Transaction>, _>(None).unwrap();
        }
        mock.push::<H256, _>(tx_hash).unwrap();

        let (tx, request) = filled(&client, &signer);
        match client.broadcast(&tx, &request, &signer).await.unwrap_err() {
            ClientError::Connectivity(msg) => assert!(msg.contains("dropped"), "{msg}"),
            other => panic!("expected connectivity, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_broadcast_is_classified() {
        let (client, mock) = fast_client();
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 11_155_111).unwrap();
        mock.push_response(MockResponse::Error(JsonRpcError {
            code: -32000,
            message: "insufficient funds for gas * price + value".into(),
            data: None,
        }));

        let (tx, request) = filled(&client, &signer);
        let err = client.broadcast(&tx, &request, &signer).await.unwrap_err();
        assert!(matches!(err, ClientError::Reverted { .. }), "got {err:?}");
    }

    #[test]
    fn receipt_fields_map_to_confirmation() {
        let tx_hash = H256::repeat_byte(1);
        let receipt = TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: None,
            status: Some(U64::one()),
            ..Default::default()
        };
        let confirmation = confirmation_from_receipt(tx_hash, Some(receipt)).unwrap();
        assert_eq!(confirmation.block_number, None);
        assert!(matches!(
            confirmation_from_receipt(tx_hash, None),
            Err(ClientError::Connectivity(_))
        ));
    }
}
