//! Controller, services and identity provider bundled for a front end that
//! awaits each step in turn (the CLI and the tests).

use std::sync::Arc;

use ethers::types::Address;
use tracing::warn;

use crate::config::IdentityConfig;
use crate::controller::{ComposeForm, Controller, Followup};
use crate::error::{ClientError, Result, SharedResult};
use crate::identity::{IdentityProvider, ETHEREUM_WALLET};
use crate::service::BoardService;
use crate::submission::Settled;

pub struct Session {
    pub controller: Controller,
    service: Arc<BoardService>,
    identity: Option<Box<dyn IdentityProvider>>,
}

impl Session {
    pub fn new(service: Arc<BoardService>, identity: Option<Box<dyn IdentityProvider>>) -> Self {
        Self {
            controller: Controller::new(service.config()),
            service,
            identity,
        }
    }

    pub fn service(&self) -> &Arc<BoardService> {
        &self.service
    }

    pub fn provider(&self) -> Option<&dyn IdentityProvider> {
        self.identity.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.controller.is_connected(self.provider())
    }

    /// Address of the connected Ethereum account.
    pub fn address(&self) -> Option<Address> {
        self.provider()?
            .current_identity()?
            .account_with(ETHEREUM_WALLET)?
            .address
    }

    pub fn connect(&mut self) -> Result<()> {
        let provider = self
            .identity
            .as_deref_mut()
            .ok_or_else(|| unavailable(&self.service))?;
        self.controller.connect(provider)
    }

    pub fn disconnect(&mut self) -> Result<()> {
        let provider = self
            .identity
            .as_deref_mut()
            .ok_or_else(|| unavailable(&self.service))?;
        self.controller.disconnect(provider);
        Ok(())
    }

    /// Re-query messages and balance and hand the result to the controller.
    pub async fn refresh(&mut self) -> SharedResult<()> {
        let connection = self.controller.connection();
        let result = self.service.state().await.map_err(Arc::new);
        let outcome = result.as_ref().map(|_| ()).map_err(Arc::clone);
        self.controller.apply_state(connection, result);
        outcome
    }

    /// Fill the compose form, submit it and wait for the ledger. A successful
    /// submission is followed by a refresh.
    pub async fn send(&mut self, amount: &str, text: &str) -> Result<Settled> {
        self.controller.form = ComposeForm {
            message: text.to_string(),
            amount: amount.to_string(),
        };
        let submission = self
            .controller
            .submit(self.service.submissions(), self.identity.as_deref())?;
        let settled = submission.await;

        if self.controller.apply_settled(&settled) == Followup::Refresh {
            if let Err(e) = self.refresh().await {
                warn!(error = %e, "refresh after confirmation failed");
            }
        }
        Ok(settled)
    }
}

fn unavailable(service: &BoardService) -> ClientError {
    match &service.config().identity {
        IdentityConfig::Disabled { reason } => ClientError::Config(reason.clone()),
        IdentityConfig::Enabled { .. } => {
            ClientError::Config("No identity provider configured".into())
        }
    }
}
