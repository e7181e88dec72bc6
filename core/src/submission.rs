//! Paid message submission and its transaction lifecycle.
//!
//! `submit_message` validates locally, moves a fresh handle to `Pending` and
//! returns the broadcast as a `Submission` future. The future resolves to a
//! `Settled` value which the owner of the handle applies; nothing here
//! triggers a refresh.

use std::fmt;
use std::future::IntoFuture;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ethers::abi::Token;
use futures::future::{BoxFuture, FutureExt};
use tracing::{info, warn};

use crate::display::{parse_eth_amount, wei_to_eth};
use crate::error::{ClientError, Result, SharedResult};
use crate::network::{ChainClient, Confirmation, PAY};
use crate::signer::Signer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TxStatus::Idle => "idle",
            TxStatus::Pending => "pending",
            TxStatus::Succeeded => "succeeded",
            TxStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Lifecycle of one submission: `Idle -> Pending -> Succeeded | Failed`,
/// and back to `Idle` through `reset`.
#[derive(Debug, Clone, Default)]
pub struct TransactionHandle {
    id: u64,
    status: TxStatus,
    confirmation: Option<Confirmation>,
    error: Option<Arc<ClientError>>,
}

impl TransactionHandle {
    pub fn idle() -> Self {
        Self::default()
    }

    fn new(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn status(&self) -> TxStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == TxStatus::Pending
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    /// Present only while `Failed`.
    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_deref()
    }

    fn begin(&mut self) -> Result<()> {
        if self.status != TxStatus::Idle {
            return Err(ClientError::InvalidState(format!(
                "Cannot start a transaction that is already {}",
                self.status
            )));
        }
        self.status = TxStatus::Pending;
        Ok(())
    }

    /// Apply a settled outcome. Ignored unless this handle is `Pending` and
    /// the outcome belongs to it. Returns whether the handle changed.
    pub fn settle(&mut self, settled: &Settled) -> bool {
        if !self.is_pending() || settled.handle_id != self.id {
            return false;
        }
        match &settled.outcome {
            Ok(confirmation) => {
                self.status = TxStatus::Succeeded;
                self.confirmation = Some(confirmation.clone());
            }
            Err(e) => {
                self.status = TxStatus::Failed;
                self.error = Some(e.clone());
            }
        }
        true
    }

    /// Return a finished handle to `Idle`. No-op from `Idle`; a `Pending`
    /// handle cannot be reset because its broadcast cannot be recalled.
    pub fn reset(&mut self) {
        if matches!(self.status, TxStatus::Succeeded | TxStatus::Failed) {
            self.status = TxStatus::Idle;
            self.confirmation = None;
            self.error = None;
        }
    }
}

/// Final outcome of a submission, tagged with the handle it belongs to.
#[derive(Debug, Clone)]
pub struct Settled {
    pub handle_id: u64,
    pub outcome: SharedResult<Confirmation>,
}

impl Settled {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// The in-flight broadcast. Nothing is sent until it is awaited.
pub struct Submission {
    handle_id: u64,
    future: BoxFuture<'static, Settled>,
}

impl Submission {
    pub fn handle_id(&self) -> u64 {
        self.handle_id
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("handle_id", &self.handle_id)
            .finish_non_exhaustive()
    }
}

impl IntoFuture for Submission {
    type Output = Settled;
    type IntoFuture = BoxFuture<'static, Settled>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

pub struct SubmissionService {
    client: Arc<dyn ChainClient>,
    next_id: AtomicU64,
}

impl SubmissionService {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self {
            client,
            next_id: AtomicU64::new(1),
        }
    }

    /// Validate and start a paid `pay(text)` call carrying `value_amount` ETH.
    ///
    /// Validation failures return before any network activity. On success
    /// the returned handle is already `Pending`; await the `Submission` for
    /// the outcome and apply it with [`TransactionHandle::settle`].
    pub fn submit_message(
        &self,
        text: &str,
        value_amount: &str,
        signer: Option<Arc<dyn Signer>>,
    ) -> Result<(TransactionHandle, Submission)> {
        if text.trim().is_empty() {
            return Err(ClientError::Validation("Message cannot be empty".into()));
        }
        let value = parse_eth_amount(value_amount)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut handle = TransactionHandle::new(id);
        handle.begin()?;

        info!(handle = id, value = %wei_to_eth(value), "submitting message");

        let client = self.client.clone();
        let args = vec![Token::String(text.to_string())];
        let future = async move {
            let outcome = client
                .write(PAY, &args, value, signer.as_deref())
                .await
                .map_err(Arc::new);
            match &outcome {
                Ok(c) => info!(handle = id, tx = %c.tx_hash_hex(), "message confirmed"),
                Err(e) => warn!(handle = id, error = %e, "submission failed"),
            }
            Settled {
                handle_id: id,
                outcome,
            }
        }
        .boxed();

        Ok((
            handle,
            Submission {
                handle_id: id,
                future,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkStatus;
    use crate::signer::SoftwareSigner;
    use async_trait::async_trait;
    use ethers::types::{H256, U256};
    use std::sync::Mutex;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[derive(Default)]
    struct Recorder {
        writes: Mutex<Vec<(String, Vec<Token>, U256, bool)>>,
        reject: bool,
    }

    #[async_trait]
    impl ChainClient for Recorder {
        async fn read(&self, _function: &str, _args: &[Token]) -> Result<Vec<Token>> {
            unreachable!("submission never reads")
        }

        async fn write(
            &self,
            function: &str,
            args: &[Token],
            value: U256,
            signer: Option<&dyn Signer>,
        ) -> Result<Confirmation> {
            self.writes.lock().unwrap().push((
                function.to_string(),
                args.to_vec(),
                value,
                signer.is_some(),
            ));
            if self.reject {
                return Err(ClientError::UserRejected);
            }
            signer.ok_or(ClientError::NoSigner)?;
            Ok(Confirmation {
                tx_hash: H256::repeat_byte(0xab),
                block_number: Some(1),
                gas_used: None,
            })
        }

        async fn status(&self) -> Result<NetworkStatus> {
            unreachable!()
        }
    }

    fn signer() -> Option<Arc<dyn Signer>> {
        Some(Arc::new(SoftwareSigner::from_private_key(DEV_KEY, 11_155_111).unwrap()))
    }

    fn service(reject: bool) -> (SubmissionService, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            reject,
            ..Default::default()
        });
        (SubmissionService::new(recorder.clone()), recorder)
    }

    #[tokio::test]
    async fn valid_submission_is_pending_before_any_write() {
        let (svc, rec) = service(false);
        let (handle, submission) = svc.submit_message("gm", "0.001", signer()).unwrap();

        assert_eq!(handle.status(), TxStatus::Pending);
        assert!(rec.writes.lock().unwrap().is_empty());
        assert_eq!(submission.handle_id(), handle.id());

        let settled = submission.await;
        assert!(settled.succeeded());
        let writes = rec.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, PAY);
        assert_eq!(writes[0].1, vec![Token::String("gm".into())]);
        assert_eq!(writes[0].2, U256::exp10(15));
        assert!(writes[0].3);
    }

    #[tokio::test]
    async fn settle_success_and_reset() {
        let (svc, _) = service(false);
        let (mut handle, submission) = svc.submit_message("gm", "0.001", signer()).unwrap();
        assert!(handle.settle(&submission.await));
        assert_eq!(handle.status(), TxStatus::Succeeded);
        assert!(handle.confirmation().is_some());
        assert!(handle.error().is_none());

        handle.reset();
        assert_eq!(handle.status(), TxStatus::Idle);
        assert!(handle.confirmation().is_none());
    }

    #[tokio::test]
    async fn rejection_fails_with_detail() {
        let (svc, _) = service(true);
        let (mut handle, submission) = svc.submit_message("gm", "0.001", signer()).unwrap();
        handle.settle(&submission.await);
        assert_eq!(handle.status(), TxStatus::Failed);
        assert!(matches!(handle.error(), Some(ClientError::UserRejected)));

        handle.reset();
        assert_eq!(handle.status(), TxStatus::Idle);
        assert!(handle.error().is_none());
    }

    #[tokio::test]
    async fn missing_signer_settles_as_failed() {
        let (svc, _) = service(false);
        let (mut handle, submission) = svc.submit_message("gm", "0.001", None).unwrap();
        handle.settle(&submission.await);
        assert!(matches!(handle.error(), Some(ClientError::NoSigner)));
    }

    #[test]
    fn invalid_input_never_reaches_the_client() {
        let (svc, rec) = service(false);
        for (text, amount) in [("", "0.001"), ("   ", "0.001"), ("gm", ""), ("gm", "abc"), ("gm", "-1")] {
            let err = svc.submit_message(text, amount, signer()).unwrap_err();
            assert!(matches!(err, ClientError::Validation(_)), "{text:?}/{amount:?}");
        }
        assert!(rec.writes.lock().unwrap().is_empty());
    }

    #[test]
    fn accepts_full_wei_precision() {
        let (svc, _) = service(false);
        assert!(svc
            .submit_message("gm", "0.000000000000000001", signer())
            .is_ok());
        assert!(svc
            .submit_message("gm", "0.0000000000000000001", signer())
            .is_err());
    }

    #[test]
    fn handles_get_distinct_ids() {
        let (svc, _) = service(false);
        let (a, _) = svc.submit_message("one", "0", signer()).unwrap();
        let (b, _) = svc.submit_message("two", "0", signer()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn reset_from_idle_is_noop() {
        let mut handle = TransactionHandle::idle();
        handle.reset();
        handle.reset();
        assert_eq!(handle.status(), TxStatus::Idle);
    }

    #[test]
    fn idle_handle_ignores_settlement() {
        let mut handle = TransactionHandle::idle();
        let settled = Settled {
            handle_id: handle.id(),
            outcome: Err(Arc::new(ClientError::UserRejected)),
        };
        assert!(!handle.settle(&settled));
        assert_eq!(handle.status(), TxStatus::Idle);
    }

    #[test]
    fn pending_handle_ignores_foreign_settlement_and_reset() {
        let mut handle = TransactionHandle::new(7);
        handle.begin().unwrap();
        let foreign = Settled {
            handle_id: 8,
            outcome: Err(Arc::new(ClientError::UserRejected)),
        };
        assert!(!handle.settle(&foreign));
        handle.reset();
        assert!(handle.is_pending());
        assert!(handle.begin().is_err());
    }
}
