use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Element, Fill};
use tipjar_core::controller::{DEFAULT_AMOUNT, MIN_AMOUNT};

use crate::messages::Message;
use crate::{styles, App, MUTED};

impl App {
    pub(crate) fn view_compose(&self) -> Element<'_, Message> {
        let form = &self.controller.form;
        let pending = self.controller.handle().is_pending();

        let title = text("Buy me a coffee").size(20).font(styles::BOLD);

        let mut message_input =
            text_input("Say something nice", &form.message).padding(10).size(14);
        let mut amount_input = text_input(DEFAULT_AMOUNT, &form.amount).padding(10).size(14);
        if !pending {
            message_input = message_input.on_input(Message::MessageChanged);
            amount_input = amount_input
                .on_input(Message::AmountChanged)
                .on_submit(Message::Submit);
        }

        let mut send = button(text(self.controller.submit_label()).size(14))
            .padding([10, 24])
            .style(styles::btn_primary);
        if self.controller.can_submit(self.is_connected()) {
            send = send.on_press(Message::Submit);
        }

        let mut col = column![
            title,
            Space::new().height(8),
            text("Message").size(12).color(MUTED),
            message_input,
            text("Amount (ETH)").size(12).color(MUTED),
            amount_input,
            text(format!("Minimum {MIN_AMOUNT} ETH")).size(11).color(MUTED),
            Space::new().height(8),
            send,
        ]
        .spacing(6);

        if let Some(confirmation) = self.controller.last_confirmation() {
            let hash = confirmation.tx_hash_hex();
            let label = match confirmation.block_number {
                Some(block) => format!("Last coffee in block {block}"),
                None => "Last coffee confirmed".to_string(),
            };
            col = col.push(Space::new().height(8)).push(
                row![
                    text(label).size(12).color(MUTED),
                    Space::new().width(Fill),
                    button(text("View on explorer").size(12))
                        .style(styles::btn_ghost)
                        .on_press(Message::OpenTx(hash)),
                ]
                .align_y(iced::Alignment::Center),
            );
        }

        container(col)
            .padding(20)
            .width(iced::Length::FillPortion(2))
            .style(styles::card)
            .into()
    }
}
