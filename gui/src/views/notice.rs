use iced::widget::{button, container, row, text, Space};
use iced::{Element, Fill};

use crate::messages::Message;
use crate::{styles, App};

impl App {
    pub(crate) fn view_notice(&self) -> Option<Element<'_, Message>> {
        let notice = self.controller.notice()?;
        let bar = row![
            text(notice.text()).size(14),
            Space::new().width(Fill),
            button(text("Dismiss").size(12))
                .style(styles::btn_ghost)
                .on_press(Message::DismissNotice),
        ]
        .align_y(iced::Alignment::Center);

        Some(
            container(container(bar).padding([8, 14]).style(styles::notice(notice.is_error())))
                .padding([10, 20])
                .into(),
        )
    }
}
