use ethers::types::{Address, H256, U256};
use serde::Serialize;

use crate::config::Chain;

/// One paid message as stored by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub sender: Address,
    pub text: String,
    /// Seconds since the Unix epoch, assigned by the ledger at inclusion.
    pub timestamp: u64,
}

/// Snapshot of what the contract holds right now. Never mutated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractState {
    pub messages: Vec<Message>,
    /// Contract balance in wei.
    pub balance: U256,
}

/// Ledger confirmation of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
}

impl Confirmation {
    pub fn tx_hash_hex(&self) -> String {
        format!("{:#x}", self.tx_hash)
    }
}

#[derive(Debug, Clone)]
pub struct NetworkStatus {
    pub chain: Chain,
    pub chain_id: u64,
    pub block_number: u64,
    pub rpc_url: String,
    pub contract_address: Address,
}
