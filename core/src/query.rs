//! Contract queries: message history and contract balance.

use std::sync::Arc;

use ethers::abi::Token;
use ethers::types::U256;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::network::{ChainClient, ContractState, Message, GET_ALL_MESSAGES, GET_BALANCE};

/// Stateless read side of the contract. Every call goes to the ledger.
#[derive(Clone)]
pub struct ContractQueries {
    client: Arc<dyn ChainClient>,
}

impl ContractQueries {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }

    /// Every message ever paid for, in ledger order.
    pub async fn fetch_all_messages(&self) -> Result<Vec<Message>> {
        let tokens = self.client.read(GET_ALL_MESSAGES, &[]).await?;
        let messages = decode_messages(tokens)?;
        debug!(count = messages.len(), "fetched messages");
        Ok(messages)
    }

    /// Contract balance in wei.
    pub async fn fetch_balance(&self) -> Result<U256> {
        let tokens = self.client.read(GET_BALANCE, &[]).await?;
        match single(tokens, GET_BALANCE)? {
            Token::Uint(balance) => Ok(balance),
            other => Err(unexpected(GET_BALANCE, "uint256", &other)),
        }
    }

    /// Both reads, issued concurrently.
    pub async fn fetch_state(&self) -> Result<ContractState> {
        let (messages, balance) =
            futures::try_join!(self.fetch_all_messages(), self.fetch_balance())?;
        Ok(ContractState { messages, balance })
    }
}

fn single(tokens: Vec<Token>, function: &str) -> Result<Token> {
    let mut iter = tokens.into_iter();
    match (iter.next(), iter.next()) {
        (Some(token), None) => Ok(token),
        _ => Err(ClientError::Decode(format!(
            "{function} should return exactly one value"
        ))),
    }
}

fn unexpected(function: &str, expected: &str, got: &Token) -> ClientError {
    ClientError::Decode(format!("{function}: expected {expected}, got {got}"))
}

fn decode_messages(tokens: Vec<Token>) -> Result<Vec<Message>> {
    let items = match single(tokens, GET_ALL_MESSAGES)? {
        Token::Array(items) => items,
        other => return Err(unexpected(GET_ALL_MESSAGES, "an array", &other)),
    };
    items.into_iter().map(decode_message).collect()
}

fn decode_message(token: Token) -> Result<Message> {
    let fields = match token {
        Token::Tuple(fields) => fields,
        other => return Err(unexpected(GET_ALL_MESSAGES, "a message tuple", &other)),
    };
    let [sender, text, timestamp]: [Token; 3] = fields.try_into().map_err(|f: Vec<Token>| {
        ClientError::Decode(format!("message tuple has {} fields, expected 3", f.len()))
    })?;

    let sender = match sender {
        Token::Address(a) => a,
        other => return Err(unexpected(GET_ALL_MESSAGES, "an address", &other)),
    };
    let text = match text {
        Token::String(s) => s,
        other => return Err(unexpected(GET_ALL_MESSAGES, "a string", &other)),
    };
    let timestamp = match timestamp {
        Token::Uint(t) if t <= U256::from(u64::MAX) => t.as_u64(),
        Token::Uint(t) => {
            return Err(ClientError::Decode(format!(
                "message timestamp {t} is out of range"
            )))
        }
        other => return Err(unexpected(GET_ALL_MESSAGES, "a uint256", &other)),
    };

    Ok(Message {
        sender,
        text,
        timestamp,
    })
}
