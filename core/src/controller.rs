//! View/controller state shared by the CLI and the GUI.
//!
//! The controller owns the compose form, the single active transaction
//! handle and the latest query results. It performs no I/O of its own:
//! reads and the broadcast are awaited by the caller and fed back in through
//! `apply_state` and `apply_settled`.

use ethers::types::U256;
use tracing::{debug, warn};

use crate::config::{AppConfig, IdentityConfig};
use crate::display::{decimal_places, format_fund, parse_eth_amount, wei_to_eth};
use crate::error::{ClientError, Result, SharedResult};
use crate::identity::{IdentityProvider, EMBEDDED_ETHEREUM_WALLET, ETHEREUM_WALLET};
use crate::network::{Confirmation, ContractState, Message};
use crate::submission::{Settled, Submission, SubmissionService, TransactionHandle, TxStatus};

pub const CONNECT_PROMPT: &str = "Connect your wallet to buy me a coffee";
pub const NO_DATA_TEXT: &str = "No data yet";
pub const DEFAULT_AMOUNT: &str = "0.001";
pub const MIN_AMOUNT: &str = "0.000001";
/// Decimal places the amount field accepts.
pub const FORM_DECIMALS: usize = 6;

pub const SUBMIT_LABEL: &str = "Send Coffee";
pub const SUBMITTING_LABEL: &str = "Sending...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeForm {
    pub message: String,
    pub amount: String,
}

impl Default for ComposeForm {
    fn default() -> Self {
        Self {
            message: String::new(),
            amount: DEFAULT_AMOUNT.to_string(),
        }
    }
}

impl ComposeForm {
    /// Check the fields and return the amount in wei.
    pub fn validate(&self) -> Result<U256> {
        if self.message.trim().is_empty() {
            return Err(ClientError::Validation("Please enter a message".into()));
        }
        let wei = parse_eth_amount(&self.amount)?;
        if decimal_places(&self.amount) > FORM_DECIMALS {
            return Err(ClientError::Validation(format!(
                "Amount supports at most {FORM_DECIMALS} decimal places"
            )));
        }
        if wei < min_amount_wei() {
            return Err(ClientError::Validation(format!(
                "Minimum amount is {MIN_AMOUNT} ETH"
            )));
        }
        Ok(wei)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn min_amount_wei() -> U256 {
    U256::exp10(crate::display::ETH_DECIMALS - FORM_DECIMALS)
}

/// Which session button to offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    /// Provider still initialising.
    Hidden,
    Connect,
    Disconnect,
    /// Wallet features are switched off by configuration.
    Unavailable(String),
}

/// What the message area should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Board<'a> {
    ConnectPrompt,
    NoData,
    LoadFailed(String),
    Empty,
    Messages(&'a [Message]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    Info(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(s) | Notice::Error(s) | Notice::Info(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// What the caller should do after applying a settled submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    Refresh,
    None,
}

#[derive(Debug)]
pub struct Controller {
    pub form: ComposeForm,
    handle: TransactionHandle,
    state: Option<ContractState>,
    load_error: Option<String>,
    attempts_since_connect: u32,
    connection: u64,
    notice: Option<Notice>,
    last_confirmation: Option<Confirmation>,
    disabled_reason: Option<String>,
}

impl Controller {
    pub fn new(config: &AppConfig) -> Self {
        let disabled_reason = match &config.identity {
            IdentityConfig::Enabled { .. } => None,
            IdentityConfig::Disabled { reason } => Some(reason.clone()),
        };
        Self {
            form: ComposeForm::default(),
            handle: TransactionHandle::idle(),
            state: None,
            load_error: None,
            attempts_since_connect: 0,
            connection: 0,
            notice: disabled_reason.clone().map(Notice::Info),
            last_confirmation: None,
            disabled_reason,
        }
    }

    // -- Session --

    pub fn affordance(&self, provider: Option<&dyn IdentityProvider>) -> Affordance {
        match provider {
            None => Affordance::Unavailable(
                self.disabled_reason
                    .clone()
                    .unwrap_or_else(|| "Wallet features are disabled.".into()),
            ),
            Some(p) if !p.ready() => Affordance::Hidden,
            Some(p) if p.is_authenticated() => Affordance::Disconnect,
            Some(_) => Affordance::Connect,
        }
    }

    /// Authenticated and holding an account that can sign on Ethereum.
    pub fn is_connected(&self, provider: Option<&dyn IdentityProvider>) -> bool {
        provider.is_some_and(|p| {
            p.is_authenticated()
                && p.signer().is_some()
                && p
                    .current_identity()
                    .is_some_and(|id| id.has_account_with(ETHEREUM_WALLET))
        })
    }

    pub fn connect(&mut self, provider: &mut dyn IdentityProvider) -> Result<()> {
        if !provider.ready() {
            return Err(ClientError::InvalidState(
                "Identity provider is not ready yet".into(),
            ));
        }
        provider.login()?;

        if let Some(identity) = provider.current_identity() {
            debug!(
                user = %identity.user_id,
                embedded = identity.has_account_with(EMBEDDED_ETHEREUM_WALLET),
                "wallet connected"
            );
        }
        self.start_connection();
        self.notice = None;
        Ok(())
    }

    pub fn disconnect(&mut self, provider: &mut dyn IdentityProvider) {
        provider.logout();
        self.handle.reset();
        self.notice = None;
        self.start_connection();
    }

    /// Forget everything loaded under the previous connection.
    fn start_connection(&mut self) {
        self.connection = self.connection.wrapping_add(1);
        self.attempts_since_connect = 0;
        self.state = None;
        self.load_error = None;
    }

    /// Tag for refreshes started now. Results carrying an older tag are
    /// dropped by `apply_state`.
    pub fn connection(&self) -> u64 {
        self.connection
    }

    // -- Submission --

    /// Validate the form and hand it to the submission service. Only one
    /// transaction may be pending at a time.
    pub fn submit(
        &mut self,
        service: &SubmissionService,
        provider: Option<&dyn IdentityProvider>,
    ) -> Result<Submission> {
        if self.handle.is_pending() {
            return Err(ClientError::Validation(
                "A transaction is already pending".into(),
            ));
        }
        self.form.validate()?;

        let signer = provider.and_then(|p| p.signer());
        let (handle, submission) =
            service.submit_message(&self.form.message, &self.form.amount, signer)?;
        self.handle = handle;
        self.notice = None;
        Ok(submission)
    }

    /// Apply the outcome of a submission. Succeeded clears the form and asks
    /// for a refresh; Failed keeps the form and reports the error.
    pub fn apply_settled(&mut self, settled: &Settled) -> Followup {
        if !self.handle.settle(settled) {
            debug!(handle = settled.handle_id, "ignoring stale settlement");
            return Followup::None;
        }
        match self.handle.status() {
            TxStatus::Succeeded => {
                self.last_confirmation = self.handle.confirmation().cloned();
                let tx = self
                    .last_confirmation
                    .as_ref()
                    .map(|c| c.tx_hash_hex())
                    .unwrap_or_default();
                self.notice = Some(Notice::Success(format!("Coffee sent! Tx {tx}")));
                self.form.clear();
                self.handle = TransactionHandle::idle();
                Followup::Refresh
            }
            TxStatus::Failed => {
                let message = self
                    .handle
                    .error()
                    .map(ClientError::user_message)
                    .unwrap_or_else(|| "Transaction failed".into());
                self.notice = Some(Notice::Error(message));
                Followup::None
            }
            TxStatus::Idle | TxStatus::Pending => Followup::None,
        }
    }

    /// Clear the current notice and return a failed handle to idle.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        if self.handle.status() == TxStatus::Failed {
            self.handle.reset();
        }
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    // -- Queries --

    /// Record the result of a refresh started under `connection`. A failure
    /// on the first attempt after connecting is shown; later failures keep
    /// whatever was shown before.
    pub fn apply_state(&mut self, connection: u64, result: SharedResult<ContractState>) {
        if connection != self.connection {
            debug!(connection, current = self.connection, "ignoring stale refresh");
            return;
        }
        self.attempts_since_connect = self.attempts_since_connect.saturating_add(1);
        match result {
            Ok(state) => {
                self.state = Some(state);
                self.load_error = None;
            }
            Err(e) if self.attempts_since_connect == 1 => {
                warn!(error = %e, "initial load failed");
                self.load_error = Some(e.user_message());
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, keeping previous data");
                self.load_error = None;
            }
        }
    }

    pub fn board(&self, connected: bool) -> Board<'_> {
        if !connected {
            return Board::ConnectPrompt;
        }
        if let Some(err) = &self.load_error {
            return Board::LoadFailed(err.clone());
        }
        match &self.state {
            None => Board::NoData,
            Some(state) if state.messages.is_empty() => Board::Empty,
            Some(state) => Board::Messages(&state.messages),
        }
    }

    /// Contract balance in ETH, "0" until loaded.
    pub fn balance_display(&self) -> String {
        self.state
            .as_ref()
            .map(|s| wei_to_eth(s.balance))
            .unwrap_or_else(|| "0".into())
    }

    pub fn fund_line(&self) -> String {
        format_fund(self.state.as_ref().map(|s| s.balance).unwrap_or_default())
    }

    // -- Accessors --

    pub fn handle(&self) -> &TransactionHandle {
        &self.handle
    }

    pub fn state(&self) -> Option<&ContractState> {
        self.state.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn last_confirmation(&self) -> Option<&Confirmation> {
        self.last_confirmation.as_ref()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.handle.is_pending() {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn can_submit(&self, connected: bool) -> bool {
        connected && !self.handle.is_pending()
    }
}
