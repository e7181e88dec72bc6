/// Chain client adapter: reads and paid writes against the message contract.
mod contract;
mod types;
mod write;

pub use contract::{message_storage_abi, GET_ALL_MESSAGES, GET_BALANCE, PAY};
pub use types::*;

use std::time::Duration;

use async_trait::async_trait;
use ethers::abi::{Abi, Function, Token};
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider, ProviderError, RpcError};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, TransactionRequest, U256};
use tracing::debug;

use crate::config::{AppConfig, Chain};
use crate::error::{ClientError, Result};
use crate::signer::Signer;

/// How often a broadcast transaction is polled for its receipt.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// EIP-1193 error code for a request the user declined.
const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code nodes use for a reverted `eth_call`/`eth_estimateGas`.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Node messages that mean the ledger itself refused the transaction.
const LEDGER_REJECTIONS: &[&str] = &["execution reverted", "insufficient funds"];

/// Read and write access to one contract on one chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Call a view function against current ledger state. Never mutates.
    async fn read(&self, function: &str, args: &[Token]) -> Result<Vec<Token>>;

    /// Sign and broadcast a state-changing call, then wait for inclusion.
    /// Every call broadcasts an independent transaction.
    async fn write(
        &self,
        function: &str,
        args: &[Token],
        value: U256,
        signer: Option<&dyn Signer>,
    ) -> Result<Confirmation>;

    /// Chain, head block and endpoint details.
    async fn status(&self) -> Result<NetworkStatus>;
}

pub struct EthersClient<P = Http> {
    provider: Provider<P>,
    abi: Abi,
    contract: Address,
    chain: Chain,
    rpc_url: String,
}

impl EthersClient<Http> {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| ClientError::Config(format!("Invalid RPC URL '{}': {e}", config.rpc_url)))?
            .interval(RECEIPT_POLL_INTERVAL);
        Self::with_provider(provider, config)
    }
}

impl<P: JsonRpcClient> EthersClient<P> {
    /// Wrap an existing provider. Useful for testing with a `MockProvider`.
    pub fn with_provider(provider: Provider<P>, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            provider,
            abi: message_storage_abi()?,
            contract: config.contract_address,
            chain: config.chain,
            rpc_url: config.rpc_url.clone(),
        })
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    fn function(&self, name: &str) -> Result<&Function> {
        self.abi
            .function(name)
            .map_err(|_| ClientError::InvalidState(format!("Contract has no function '{name}'")))
    }

    fn encode_call(&self, function: &Function, args: &[Token]) -> Result<Vec<u8>> {
        function.encode_input(args).map_err(|e| {
            ClientError::InvalidState(format!("Cannot encode call to {}: {e}", function.name))
        })
    }
}

#[async_trait]
impl<P> ChainClient for EthersClient<P>
where
    P: JsonRpcClient + 'static,
{
    async fn read(&self, name: &str, args: &[Token]) -> Result<Vec<Token>> {
        let function = self.function(name)?;
        let data = self.encode_call(function, args)?;
        let tx: TypedTransaction = TransactionRequest::new()
            .to(self.contract)
            .data(data)
            .into();

        debug!(function = name, contract = %format!("{:#x}", self.contract), "eth_call");
        let raw = self
            .provider
            .call(&tx, None)
            .await
            .map_err(|e| ClientError::Connectivity(format!("Failed to call {name}: {e}")))?;

        function
            .decode_output(&raw)
            .map_err(|e| ClientError::Decode(format!("Cannot decode {name} result: {e}")))
    }

    async fn write(
        &self,
        name: &str,
        args: &[Token],
        value: U256,
        signer: Option<&dyn Signer>,
    ) -> Result<Confirmation> {
        let signer = signer.ok_or(ClientError::NoSigner)?;
        self.sign_and_send(name, args, value, signer).await
    }

    async fn status(&self) -> Result<NetworkStatus> {
        let block_number = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| ClientError::Connectivity(format!("Failed to query block number: {e}")))?
            .as_u64();

        Ok(NetworkStatus {
            chain: self.chain,
            chain_id: self.chain.chain_id(),
            block_number,
            rpc_url: self.rpc_url.clone(),
            contract_address: self.contract,
        })
    }
}

/// Map a provider failure during a write to the client error taxonomy.
/// Only execution rejections count as `Reverted`. Rate limits, unknown
/// methods and internal node errors are connectivity problems.
pub(crate) fn classify_write_error(err: ProviderError) -> ClientError {
    if let Some(resp) = err.as_error_response() {
        let lowered = resp.message.to_lowercase();
        if resp.code == USER_REJECTED_CODE || lowered.contains("user rejected") {
            return ClientError::UserRejected;
        }
        if resp.code == EXECUTION_REVERTED_CODE
            || LEDGER_REJECTIONS.iter().any(|m| lowered.contains(m))
        {
            return ClientError::Reverted {
                reason: resp.message.clone(),
            };
        }
        return ClientError::Connectivity(format!("Node error {}: {}", resp.code, resp.message));
    }
    ClientError::Connectivity(err.to_string())
}
