/// Start-up configuration: chain selection, RPC endpoint, contract address and
/// identity provider credentials. Built once, then passed by reference.
use std::fmt;
use std::str::FromStr;

use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Deployed Buy Me a Coffee contract used when no address is configured.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x102fFED303851eeD8185E3EA8D291820009CfD3e";

pub const ENV_CHAIN: &str = "TIPJAR_CHAIN";
pub const ENV_RPC_URL: &str = "TIPJAR_RPC_URL";
pub const ENV_CONTRACT_ADDRESS: &str = "TIPJAR_CONTRACT_ADDRESS";
pub const ENV_APP_ID: &str = "TIPJAR_APP_ID";
pub const ENV_CLIENT_ID: &str = "TIPJAR_CLIENT_ID";
pub const ENV_PRIVATE_KEY: &str = "TIPJAR_PRIVATE_KEY";

/// The fixed set of supported chains.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Mainnet,
    #[default]
    Sepolia,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::Mainnet, Chain::Sepolia];

    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Mainnet => 1,
            Chain::Sepolia => 11_155_111,
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Chain::Mainnet => "https://eth.merkle.io",
            Chain::Sepolia => "https://sepolia.drpc.org",
        }
    }

    pub fn explorer_url(&self) -> &'static str {
        match self {
            Chain::Mainnet => "https://etherscan.io",
            Chain::Sepolia => "https://sepolia.etherscan.io",
        }
    }

    pub fn from_chain_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.chain_id() == id)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Mainnet => write!(f, "mainnet"),
            Chain::Sepolia => write!(f, "sepolia"),
        }
    }
}

impl FromStr for Chain {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "ethereum" | "1" => Ok(Chain::Mainnet),
            "sepolia" | "11155111" => Ok(Chain::Sepolia),
            other => Err(ClientError::Config(format!(
                "Unknown chain '{other}'. Use 'mainnet' or 'sepolia'."
            ))),
        }
    }
}

/// Identity provider credentials. Missing values disable wallet features
/// instead of failing start-up.
#[derive(Clone, Debug, PartialEq)]
pub enum IdentityConfig {
    Enabled { app_id: String, client_id: String },
    Disabled { reason: String },
}

impl IdentityConfig {
    pub fn from_values(app_id: Option<String>, client_id: Option<String>) -> Self {
        match (non_empty(app_id), non_empty(client_id)) {
            (Some(app_id), Some(client_id)) => Self::Enabled { app_id, client_id },
            (None, _) => Self::Disabled {
                reason: format!("{ENV_APP_ID} is not set; wallet features are disabled."),
            },
            (_, None) => Self::Disabled {
                reason: format!("{ENV_CLIENT_ID} is not set; wallet features are disabled."),
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }
}

/// Raw, unvalidated configuration values as they arrive from flags or env.
#[derive(Clone, Debug, Default)]
pub struct ConfigInput {
    pub chain: Option<String>,
    pub rpc_url: Option<String>,
    pub contract_address: Option<String>,
    pub app_id: Option<String>,
    pub client_id: Option<String>,
}

impl ConfigInput {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            chain: var(ENV_CHAIN),
            rpc_url: var(ENV_RPC_URL),
            contract_address: var(ENV_CONTRACT_ADDRESS),
            app_id: var(ENV_APP_ID),
            client_id: var(ENV_CLIENT_ID),
        }
    }
}

/// Immutable application configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub chain: Chain,
    pub rpc_url: String,
    pub contract_address: Address,
    pub identity: IdentityConfig,
}

impl AppConfig {
    /// Validate raw input into a configuration. Only the chain, RPC URL and
    /// contract address can fail; identity credentials degrade to `Disabled`.
    pub fn resolve(input: ConfigInput, allow_insecure: bool) -> Result<Self> {
        let chain = match non_empty(input.chain) {
            Some(s) => s.parse()?,
            None => Chain::default(),
        };

        let rpc_url = non_empty(input.rpc_url)
            .unwrap_or_else(|| chain.default_rpc_url().to_string());
        validate_rpc_url(&rpc_url, allow_insecure)?;

        let address_str = non_empty(input.contract_address)
            .unwrap_or_else(|| DEFAULT_CONTRACT_ADDRESS.to_string());
        let contract_address = parse_address(&address_str)?;

        Ok(Self {
            chain,
            rpc_url,
            contract_address,
            identity: IdentityConfig::from_values(input.app_id, input.client_id),
        })
    }

    pub fn from_env(allow_insecure: bool) -> Result<Self> {
        Self::resolve(ConfigInput::from_env(), allow_insecure)
    }

    pub fn wallet_features_enabled(&self) -> bool {
        self.identity.is_enabled()
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{tx_hash}", self.chain.explorer_url())
    }
}

/// Parse a 0x-prefixed, 20-byte hex address.
pub fn parse_address(s: &str) -> Result<Address> {
    let s = s.trim();
    if !s.starts_with("0x") || s.len() != 42 {
        return Err(ClientError::Config(format!(
            "Invalid contract address '{s}'. Expected 0x followed by 40 hex characters."
        )));
    }
    Address::from_str(s)
        .map_err(|e| ClientError::Config(format!("Invalid contract address '{s}': {e}")))
}

/// Reject non-HTTPS RPC URLs unless `allow_insecure` is set.
pub fn validate_rpc_url(url: &str, allow_insecure: bool) -> Result<()> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if url.starts_with("http://") {
        if allow_insecure {
            return Ok(());
        }
        return Err(ClientError::Config(format!(
            "Refusing to connect over plain HTTP: {url}\nUse --insecure to allow unencrypted connections."
        )));
    }
    Err(ClientError::Config(format!(
        "Invalid RPC URL scheme: {url}\nExpected an https:// URL."
    )))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ConfigInput {
        ConfigInput {
            app_id: Some("app".into()),
            client_id: Some("client".into()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_to_sepolia_and_known_contract() {
        let config = AppConfig::resolve(input(), false).unwrap();
        assert_eq!(config.chain, Chain::Sepolia);
        assert_eq!(config.rpc_url, "https://sepolia.drpc.org");
        assert_eq!(
            config.contract_address,
            parse_address(DEFAULT_CONTRACT_ADDRESS).unwrap()
        );
        assert!(config.wallet_features_enabled());
    }

    #[test]
    fn mainnet_uses_its_own_rpc() {
        let config = AppConfig::resolve(
            ConfigInput {
                chain: Some("mainnet".into()),
                ..input()
            },
            false,
        )
        .unwrap();
        assert_eq!(config.chain.chain_id(), 1);
        assert_eq!(config.rpc_url, "https://eth.merkle.io");
    }

    #[test]
    fn unknown_chain_is_rejected() {
        let err = AppConfig::resolve(
            ConfigInput {
                chain: Some("polygon".into()),
                ..input()
            },
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unknown chain"));
    }

    #[test]
    fn missing_credentials_disable_wallet_features() {
        let config = AppConfig::resolve(ConfigInput::default(), false).unwrap();
        assert!(!config.wallet_features_enabled());
        match config.identity {
            IdentityConfig::Disabled { reason } => assert!(reason.contains(ENV_APP_ID)),
            other => panic!("expected disabled identity, got {other:?}"),
        }
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let identity = IdentityConfig::from_values(Some("app".into()), Some("   ".into()));
        assert!(!identity.is_enabled());
    }

    #[test]
    fn blank_contract_address_falls_back_to_default() {
        let config = AppConfig::resolve(
            ConfigInput {
                contract_address: Some("  ".into()),
                ..input()
            },
            false,
        )
        .unwrap();
        assert_eq!(
            config.contract_address,
            parse_address(DEFAULT_CONTRACT_ADDRESS).unwrap()
        );
    }

    #[test]
    fn malformed_contract_address_is_rejected() {
        let err = AppConfig::resolve(
            ConfigInput {
                contract_address: Some("0x1234".into()),
                ..input()
            },
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn rejects_http_rpc_without_insecure() {
        let err = validate_rpc_url("http://localhost:8545", false).unwrap_err();
        assert!(err.to_string().contains("--insecure"));
        assert!(validate_rpc_url("http://localhost:8545", true).is_ok());
    }

    #[test]
    fn rejects_invalid_rpc_scheme() {
        let err = validate_rpc_url("ws://localhost:8546", true).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL scheme"));
    }

    #[test]
    fn chain_parses_names_and_ids() {
        assert_eq!("Ethereum".parse::<Chain>().unwrap(), Chain::Mainnet);
        assert_eq!("11155111".parse::<Chain>().unwrap(), Chain::Sepolia);
        assert_eq!(Chain::from_chain_id(1), Some(Chain::Mainnet));
        assert_eq!(Chain::from_chain_id(137), None);
    }

    #[test]
    fn tx_url_points_at_chain_explorer() {
        let config = AppConfig::resolve(input(), false).unwrap();
        assert_eq!(
            config.tx_url("0xabc"),
            "https://sepolia.etherscan.io/tx/0xabc"
        );
    }
}
