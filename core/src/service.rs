use std::sync::Arc;

use ethers::types::U256;

use crate::config::AppConfig;
use crate::error::Result;
use crate::network::{ChainClient, ContractState, EthersClient, Message, NetworkStatus};
use crate::query::ContractQueries;
use crate::submission::SubmissionService;

/// Everything the front ends need from the chain, built once per process.
pub struct BoardService {
    config: AppConfig,
    client: Arc<dyn ChainClient>,
    queries: ContractQueries,
    submissions: SubmissionService,
}

impl BoardService {
    pub fn new(config: AppConfig, client: Arc<dyn ChainClient>) -> Self {
        Self {
            queries: ContractQueries::new(client.clone()),
            submissions: SubmissionService::new(client.clone()),
            config,
            client,
        }
    }

    /// Connect to the configured RPC endpoint.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let client = EthersClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn queries(&self) -> &ContractQueries {
        &self.queries
    }

    pub fn submissions(&self) -> &SubmissionService {
        &self.submissions
    }

    pub async fn state(&self) -> Result<ContractState> {
        self.queries.fetch_state().await
    }

    pub async fn messages(&self) -> Result<Vec<Message>> {
        self.queries.fetch_all_messages().await
    }

    pub async fn balance(&self) -> Result<U256> {
        self.queries.fetch_balance().await
    }

    pub async fn status(&self) -> Result<NetworkStatus> {
        self.client.status().await
    }
}
