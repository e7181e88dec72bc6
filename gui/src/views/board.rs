use iced::widget::{button, column, container, row, scrollable, text, Space};
use iced::{Element, Fill};
use tipjar_core::display::{format_board, format_timestamp, short_address};
use tipjar_core::{Board, Message as CoffeeMessage};

use crate::messages::Message;
use crate::{styles, App, MUTED};

impl App {
    pub(crate) fn view_board(&self) -> Element<'_, Message> {
        let mut refresh = button(text("Refresh").size(12)).style(styles::btn_secondary);
        if self.loading == 0 {
            refresh = refresh.on_press(Message::Refresh);
        }

        let header = row![
            text(self.controller.fund_line()).size(16).font(styles::BOLD),
            Space::new().width(Fill),
            refresh,
        ]
        .align_y(iced::Alignment::Center);

        let board = self.controller.board(self.is_connected());
        let body: Element<Message> = match board {
            Board::Messages(messages) => {
                let list = messages
                    .iter()
                    .fold(column![].spacing(8), |col, m| col.push(view_message(m)));
                scrollable(list).height(Fill).into()
            }
            Board::LoadFailed(_) => text(format_board(&board))
                .size(14)
                .color(styles::DANGER)
                .into(),
            _ => text(format_board(&board)).size(14).color(MUTED).into(),
        };

        container(column![header, styles::separator(), body].spacing(12))
            .padding(20)
            .width(iced::Length::FillPortion(3))
            .height(Fill)
            .style(styles::card)
            .into()
    }
}

fn view_message(message: &CoffeeMessage) -> Element<'_, Message> {
    let meta = row![
        text(short_address(&message.sender)).size(12).font(styles::BOLD),
        Space::new().width(Fill),
        text(format_timestamp(message.timestamp)).size(11).color(MUTED),
    ];
    container(column![meta, text(message.text.as_str()).size(14)].spacing(4))
        .padding(12)
        .width(Fill)
        .style(styles::card_flat)
        .into()
}
