pub mod commands;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod identity;
pub mod network;
pub mod query;
pub mod service;
pub mod session;
pub mod signer;
pub mod submission;

pub use commands::Command;
pub use config::{AppConfig, Chain, ConfigInput, IdentityConfig};
pub use controller::{Affordance, Board, ComposeForm, Controller, Followup, Notice};
pub use error::{ClientError, SharedResult};
pub use identity::{
    Capability, ChainFamily, EnvKeySource, Identity, IdentityProvider, KeySource,
    LinkedAccount, LocalKeyProvider,
};
pub use network::{ChainClient, Confirmation, ContractState, EthersClient, Message, NetworkStatus};
pub use query::ContractQueries;
pub use service::BoardService;
pub use session::Session;
pub use signer::{Approval, AutoApprove, SignRequest, Signer, SoftwareSigner};
pub use submission::{Settled, Submission, SubmissionService, TransactionHandle, TxStatus};

pub use ethers::types::{Address, U256};
