/// Signing abstraction that decouples transaction signing from a concrete key type.
///
use std::fmt;
use std::sync::Arc;

use ethers::abi::Token;
use ethers::signers::{LocalWallet, Signer as _};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Signature, U256};
use zeroize::Zeroizing;

use crate::display::format_balance;
use crate::error::{ClientError, Result};

/// What the signer is being asked to authorize, in terms a user can check.
#[derive(Debug, Clone)]
pub struct SignRequest {
    pub from: Address,
    pub to: Address,
    pub function: String,
    pub args: Vec<Token>,
    pub value: U256,
}

impl fmt::Display for SignRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|t| match t {
                Token::String(s) => format!("{s:?}"),
                Token::Address(a) => format!("{a:#x}"),
                other => other.to_string(),
            })
            .collect();
        write!(
            f,
            "Call {}({}) on {:#x} sending {}",
            self.function,
            args.join(", "),
            self.to,
            format_balance(self.value),
        )
    }
}

pub trait Signer: Send + Sync {
    /// Sign a fully-built transaction. Returns `ClientError::UserRejected`
    /// when the holder of the key declines.
    fn sign_transaction(&self, tx: &TypedTransaction, request: &SignRequest) -> Result<Signature>;

    /// The on-chain address controlled by this signer.
    fn address(&self) -> Address;
}

/// Approval hook consulted before every signature.
pub trait Approval: Send + Sync {
    fn approve(&self, request: &SignRequest) -> bool;
}

/// Approves everything. Used where the submit action itself is the approval.
pub struct AutoApprove;

impl Approval for AutoApprove {
    fn approve(&self, _request: &SignRequest) -> bool {
        true
    }
}

/// Software signer backed by an in-memory secp256k1 private key.
pub struct SoftwareSigner {
    wallet: LocalWallet,
    approval: Arc<dyn Approval>,
}

impl SoftwareSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        Self {
            wallet,
            approval: Arc::new(AutoApprove),
        }
    }

    /// Build a signer from a hex private key (with or without `0x`).
    pub fn from_private_key(key: &str, chain_id: u64) -> Result<Self> {
        let key = Zeroizing::new(key.trim().trim_start_matches("0x").to_string());
        if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ClientError::Validation(
                "Private key must be 32 bytes of hex".into(),
            ));
        }
        let wallet = key
            .parse::<LocalWallet>()
            .map_err(|e| ClientError::Validation(format!("Invalid private key: {e}")))?
            .with_chain_id(chain_id);
        Ok(Self::new(wallet))
    }

    pub fn with_approval(mut self, approval: Arc<dyn Approval>) -> Self {
        self.approval = approval;
        self
    }

    pub fn chain_id(&self) -> u64 {
        self.wallet.chain_id()
    }
}

impl Signer for SoftwareSigner {
    fn sign_transaction(&self, tx: &TypedTransaction, request: &SignRequest) -> Result<Signature> {
        if !self.approval.approve(request) {
            return Err(ClientError::UserRejected);
        }
        self.wallet
            .sign_transaction_sync(tx)
            .map_err(|e| ClientError::Other(anyhow::anyhow!("Failed to sign transaction: {e}")))
    }

    fn address(&self) -> Address {
        self.wallet.address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::TransactionRequest;

    // Well-known development key (anvil/hardhat account #0).
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    struct Deny;

    impl Approval for Deny {
        fn approve(&self, _request: &SignRequest) -> bool {
            false
        }
    }

    fn request(signer: &SoftwareSigner) -> SignRequest {
        SignRequest {
            from: signer.address(),
            to: Address::repeat_byte(0x10),
            function: "pay".into(),
            args: vec![Token::String("gm".into())],
            value: U256::exp10(15),
        }
    }

    fn tx(signer: &SoftwareSigner) -> TypedTransaction {
        TransactionRequest::new()
            .from(signer.address())
            .to(Address::repeat_byte(0x10))
            .value(U256::exp10(15))
            .nonce(0)
            .gas(100_000)
            .gas_price(1_000_000_000u64)
            .chain_id(11_155_111u64)
            .into()
    }

    #[test]
    fn derives_expected_address() {
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 11_155_111).unwrap();
        assert_eq!(format!("{:#x}", signer.address()), DEV_ADDRESS);
        assert_eq!(signer.chain_id(), 11_155_111);
    }

    #[test]
    fn accepts_key_without_prefix() {
        let signer =
            SoftwareSigner::from_private_key(DEV_KEY.trim_start_matches("0x"), 1).unwrap();
        assert_eq!(format!("{:#x}", signer.address()), DEV_ADDRESS);
    }

    #[test]
    fn rejects_malformed_keys() {
        let not_hex = "g".repeat(64);
        for key in ["", "0x1234", "zz", not_hex.as_str()] {
            assert!(
                matches!(
                    SoftwareSigner::from_private_key(key, 1),
                    Err(ClientError::Validation(_))
                ),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn signature_recovers_to_signer() {
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 11_155_111).unwrap();
        let tx = tx(&signer);
        let sig = signer.sign_transaction(&tx, &request(&signer)).unwrap();
        assert_eq!(sig.recover(tx.sighash()).unwrap(), signer.address());
    }

    #[test]
    fn declined_approval_is_user_rejection() {
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 11_155_111)
            .unwrap()
            .with_approval(Arc::new(Deny));
        let err = signer.sign_transaction(&tx(&signer), &request(&signer)).unwrap_err();
        assert!(matches!(err, ClientError::UserRejected));
    }

    #[test]
    fn sign_request_summary_is_readable() {
        let signer = SoftwareSigner::from_private_key(DEV_KEY, 1).unwrap();
        let summary = request(&signer).to_string();
        assert_eq!(
            summary,
            "Call pay(\"gm\") on 0x1010101010101010101010101010101010101010 sending 0.001 ETH"
        );
    }
}
