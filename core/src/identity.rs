//! Identity/session provider seam.
//!
//! The rest of the crate only asks two questions of a session: is the user
//! authenticated, and does their identity carry an account with a given set
//! of capabilities. `LocalKeyProvider` answers them from a private key.

use std::collections::BTreeSet;
use std::sync::Arc;

use ethers::types::Address;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::{AppConfig, Chain, IdentityConfig, ENV_PRIVATE_KEY};
use crate::error::{ClientError, Result};
use crate::signer::{Approval, AutoApprove, Signer, SoftwareSigner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChainFamily {
    Ethereum,
    Solana,
}

/// Something a linked account can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    /// Can sign transactions.
    Wallet,
    /// Key custody is managed by the identity provider.
    Embedded,
    Chain(ChainFamily),
}

/// Any account able to sign on an Ethereum chain.
pub const ETHEREUM_WALLET: &[Capability] =
    &[Capability::Wallet, Capability::Chain(ChainFamily::Ethereum)];

/// A provider-managed Ethereum wallet.
pub const EMBEDDED_ETHEREUM_WALLET: &[Capability] = &[
    Capability::Wallet,
    Capability::Embedded,
    Capability::Chain(ChainFamily::Ethereum),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedAccount {
    pub label: String,
    pub address: Option<Address>,
    pub capabilities: BTreeSet<Capability>,
}

impl LinkedAccount {
    pub fn new(label: impl Into<String>, address: Option<Address>, caps: &[Capability]) -> Self {
        Self {
            label: label.into(),
            address,
            capabilities: caps.iter().copied().collect(),
        }
    }

    pub fn has_all(&self, required: &[Capability]) -> bool {
        required.iter().all(|c| self.capabilities.contains(c))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub linked_accounts: Vec<LinkedAccount>,
}

impl Identity {
    pub fn has_account_with(&self, required: &[Capability]) -> bool {
        self.account_with(required).is_some()
    }

    /// First linked account carrying every capability in `required`.
    pub fn account_with(&self, required: &[Capability]) -> Option<&LinkedAccount> {
        self.linked_accounts.iter().find(|a| a.has_all(required))
    }
}

/// Authentication and signing-account source.
pub trait IdentityProvider: Send + Sync {
    /// Whether the provider has finished initialising. Nothing should offer
    /// connect/disconnect before this is true.
    fn ready(&self) -> bool;

    fn login(&mut self) -> Result<()>;

    fn logout(&mut self);

    fn is_authenticated(&self) -> bool;

    fn current_identity(&self) -> Option<&Identity>;

    /// Signer for the active account, if one is bound.
    fn signer(&self) -> Option<Arc<dyn Signer>>;
}

/// Where a private key comes from at login time.
pub trait KeySource: Send + Sync {
    fn private_key(&self) -> Result<Zeroizing<String>>;
}

/// Reads the key from an environment variable.
pub struct EnvKeySource {
    var: String,
}

impl EnvKeySource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvKeySource {
    fn default() -> Self {
        Self::new(ENV_PRIVATE_KEY)
    }
}

impl KeySource for EnvKeySource {
    fn private_key(&self) -> Result<Zeroizing<String>> {
        match std::env::var(&self.var) {
            Ok(key) if !key.trim().is_empty() => Ok(Zeroizing::new(key)),
            _ => Err(ClientError::Config(format!(
                "{} is not set. Export a private key to connect.",
                self.var
            ))),
        }
    }
}

struct LocalSession {
    identity: Identity,
    signer: Arc<SoftwareSigner>,
}

/// Identity provider backed by a locally held key.
pub struct LocalKeyProvider {
    app_id: String,
    client_id: String,
    chain: Chain,
    keys: Box<dyn KeySource>,
    approval: Arc<dyn Approval>,
    session: Option<LocalSession>,
}

impl LocalKeyProvider {
    pub fn new(
        app_id: impl Into<String>,
        client_id: impl Into<String>,
        chain: Chain,
        keys: Box<dyn KeySource>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            client_id: client_id.into(),
            chain,
            keys,
            approval: Arc::new(AutoApprove),
            session: None,
        }
    }

    /// `None` when identity credentials are not configured.
    pub fn from_config(config: &AppConfig, keys: Box<dyn KeySource>) -> Option<Self> {
        match &config.identity {
            IdentityConfig::Enabled { app_id, client_id } => Some(Self::new(
                app_id.clone(),
                client_id.clone(),
                config.chain,
                keys,
            )),
            IdentityConfig::Disabled { .. } => None,
        }
    }

    pub fn with_approval(mut self, approval: Arc<dyn Approval>) -> Self {
        self.approval = approval;
        self
    }
}

impl IdentityProvider for LocalKeyProvider {
    fn ready(&self) -> bool {
        true
    }

    fn login(&mut self) -> Result<()> {
        let key = self.keys.private_key()?;
        let signer = SoftwareSigner::from_private_key(&key, self.chain.chain_id())?
            .with_approval(self.approval.clone());
        let address = signer.address();

        debug!(
            app_id = %self.app_id,
            client_id = %self.client_id,
            address = %format!("{address:#x}"),
            "session opened"
        );

        let identity = Identity {
            user_id: format!("{}:{address:#x}", self.app_id),
            linked_accounts: vec![LinkedAccount::new("local key", Some(address), ETHEREUM_WALLET)],
        };
        self.session = Some(LocalSession {
            identity,
            signer: Arc::new(signer),
        });
        Ok(())
    }

    fn logout(&mut self) {
        if self.session.take().is_some() {
            debug!(app_id = %self.app_id, "session closed");
        }
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn current_identity(&self) -> Option<&Identity> {
        self.session.as_ref().map(|s| &s.identity)
    }

    fn signer(&self) -> Option<Arc<dyn Signer>> {
        self.session
            .as_ref()
            .map(|s| s.signer.clone() as Arc<dyn Signer>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    struct FixedKey(&'static str);

    impl KeySource for FixedKey {
        fn private_key(&self) -> Result<Zeroizing<String>> {
            Ok(Zeroizing::new(self.0.to_string()))
        }
    }

    fn provider(key: &'static str) -> LocalKeyProvider {
        LocalKeyProvider::new("app", "client", Chain::Sepolia, Box::new(FixedKey(key)))
    }

    #[test]
    fn starts_ready_and_logged_out() {
        let p = provider(DEV_KEY);
        assert!(p.ready());
        assert!(!p.is_authenticated());
        assert!(p.current_identity().is_none());
        assert!(p.signer().is_none());
    }

    #[test]
    fn login_binds_an_ethereum_wallet() {
        let mut p = provider(DEV_KEY);
        p.login().unwrap();

        assert!(p.is_authenticated());
        let identity = p.current_identity().unwrap();
        assert_eq!(
            identity.user_id,
            "app:0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert!(identity.has_account_with(ETHEREUM_WALLET));
        assert!(!identity.has_account_with(EMBEDDED_ETHEREUM_WALLET));

        let account = identity.account_with(ETHEREUM_WALLET).unwrap();
        assert_eq!(account.address, Some(p.signer().unwrap().address()));
    }

    #[test]
    fn logout_drops_session() {
        let mut p = provider(DEV_KEY);
        p.login().unwrap();
        p.logout();
        assert!(!p.is_authenticated());
        assert!(p.signer().is_none());
        // Logging out twice is harmless.
        p.logout();
    }

    #[test]
    fn bad_key_leaves_provider_logged_out() {
        let mut p = provider("not-a-key");
        assert!(p.login().is_err());
        assert!(!p.is_authenticated());
    }

    #[test]
    fn missing_env_key_is_config_error() {
        let source = EnvKeySource::new("TIPJAR_TEST_KEY_THAT_IS_NEVER_SET");
        assert!(matches!(source.private_key(), Err(ClientError::Config(_))));
    }

    #[test]
    fn disabled_config_builds_no_provider() {
        let config = AppConfig::resolve(Default::default(), false).unwrap();
        assert!(LocalKeyProvider::from_config(&config, Box::new(FixedKey(DEV_KEY))).is_none());
    }

    #[test]
    fn capability_match_requires_every_capability() {
        let account = LinkedAccount::new(
            "phantom",
            None,
            &[Capability::Wallet, Capability::Chain(ChainFamily::Solana)],
        );
        assert!(!account.has_all(ETHEREUM_WALLET));
        assert!(account.has_all(&[Capability::Wallet]));
        assert!(account.has_all(&[]));
    }
}
