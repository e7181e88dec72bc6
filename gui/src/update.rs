use std::future::IntoFuture;
use std::sync::Arc;

use iced::Task;
use tipjar_core::{Followup, Notice};
use tracing::{info, warn};

use crate::messages::Message;
use crate::App;

impl App {
    // -- Update --

    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // -- Session --
            Message::Connect => {
                let Some(provider) = self.identity.as_deref_mut() else {
                    return Task::none();
                };
                match self.controller.connect(provider) {
                    Ok(()) => {
                        info!("wallet connected");
                        self.refresh()
                    }
                    Err(e) => {
                        self.controller.notify(Notice::Error(e.user_message()));
                        Task::none()
                    }
                }
            }

            Message::Disconnect => {
                if let Some(provider) = self.identity.as_deref_mut() {
                    self.controller.disconnect(provider);
                }
                Task::none()
            }

            Message::CopyAddress => {
                if let Some(address) = self.connected_address() {
                    let notice = match &mut self.clipboard {
                        Some(cb) => match cb.set_text(format!("{address:#x}")) {
                            Ok(_) => Notice::Info("Address copied".into()),
                            Err(e) => Notice::Error(format!("Copy failed: {e}")),
                        },
                        None => Notice::Error("Clipboard not available".into()),
                    };
                    self.controller.notify(notice);
                }
                Task::none()
            }

            // -- Compose --
            Message::MessageChanged(v) => {
                self.controller.form.message = v;
                Task::none()
            }

            Message::AmountChanged(v) => {
                self.controller.form.amount = v;
                Task::none()
            }

            Message::Submit => {
                if !self.controller.can_submit(self.is_connected()) {
                    return Task::none();
                }
                match self
                    .controller
                    .submit(self.service.submissions(), self.identity.as_deref())
                {
                    Ok(submission) => {
                        Task::perform(submission.into_future(), Message::SubmissionSettled)
                    }
                    Err(e) => {
                        self.controller.notify(Notice::Error(e.user_message()));
                        Task::none()
                    }
                }
            }

            Message::SubmissionSettled(settled) => match self.controller.apply_settled(&settled) {
                Followup::Refresh => self.refresh(),
                Followup::None => Task::none(),
            },

            Message::OpenTx(hash) => {
                let url = self.service.config().tx_url(&hash);
                if let Err(e) = open::that(&url) {
                    warn!(error = %e, url = %url, "could not open explorer");
                }
                Task::none()
            }

            // -- Board --
            Message::Refresh => self.refresh(),

            Message::StateLoaded(connection, result) => {
                self.loading = self.loading.saturating_sub(1);
                self.controller.apply_state(connection, result);
                Task::none()
            }

            Message::DismissNotice => {
                self.controller.dismiss_notice();
                Task::none()
            }
        }
    }

    /// Re-read messages and balance from the contract.
    fn refresh(&mut self) -> Task<Message> {
        if !self.is_connected() {
            return Task::none();
        }
        self.loading += 1;
        let service = self.service.clone();
        let connection = self.controller.connection();
        Task::perform(
            async move { service.state().await.map_err(Arc::new) },
            move |result| Message::StateLoaded(connection, result),
        )
    }
}
