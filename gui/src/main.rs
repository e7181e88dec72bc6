mod messages;
mod styles;
mod update;
mod views;

use std::sync::Arc;

use iced::theme::Palette;
use iced::widget::{button, column, container, row, text, Space};
use iced::{Color, Element, Fill, Task, Theme};
use tracing_subscriber::EnvFilter;

use tipjar_core::display::short_address;
use tipjar_core::{
    Affordance, AppConfig, BoardService, Controller, EnvKeySource, IdentityProvider,
    LocalKeyProvider,
};

use messages::Message;

// Espresso dark palette
const BG: Color = Color::from_rgb(0.078, 0.063, 0.055); // #14100e
const SURFACE: Color = Color::from_rgb(0.141, 0.114, 0.098); // #241d19
const BORDER: Color = Color::from_rgb(0.259, 0.212, 0.180); // #42362e
const ACTIVE: Color = Color::from_rgb(0.200, 0.157, 0.125); // #332820
const MUTED: Color = Color::from_rgb(0.580, 0.522, 0.478); // #94857a
const PRIMARY: Color = Color::from_rgb(0.835, 0.537, 0.212); // #d58936

fn main() -> iced::Result {
    init_tracing();

    let allow_insecure = std::env::args().any(|a| a == "--insecure");
    let service = match AppConfig::from_env(allow_insecure).and_then(BoardService::from_config) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            tracing::error!(error = %e, "cannot start");
            std::process::exit(1);
        }
    };

    iced::application(move || App::new(service.clone()), App::update, App::view)
        .title("Buy Me a Coffee")
        .theme(App::theme)
        .run()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// -- App state --

struct App {
    service: Arc<BoardService>,
    identity: Option<Box<dyn IdentityProvider>>,
    controller: Controller,
    clipboard: Option<arboard::Clipboard>,
    loading: usize,

    // Cached theme (avoids re-allocating every frame)
    theme: Theme,
}

impl App {
    fn new(service: Arc<BoardService>) -> (Self, Task<Message>) {
        let config = service.config();
        // The Send button is the user's approval, so the signer does not ask again.
        let identity = LocalKeyProvider::from_config(config, Box::new(EnvKeySource::default()))
            .map(|p| Box::new(p) as Box<dyn IdentityProvider>);

        let app = Self {
            controller: Controller::new(config),
            identity,
            service,
            clipboard: arboard::Clipboard::new().ok(),
            loading: 0,
            theme: Theme::custom(
                "Espresso".to_string(),
                Palette {
                    background: BG,
                    text: Color::from_rgb(0.965, 0.945, 0.925),
                    primary: PRIMARY,
                    success: Color::from_rgb(0.357, 0.718, 0.435),
                    warning: Color::from_rgb(1.0, 0.757, 0.027),
                    danger: Color::from_rgb(0.906, 0.192, 0.192),
                },
            ),
        };
        (app, Task::none())
    }

    fn theme(&self) -> Theme {
        self.theme.clone()
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.controller.is_connected(self.identity.as_deref())
    }

    // -- Views --

    fn view(&self) -> Element<'_, Message> {
        let content: Element<Message> = if self.is_connected() {
            let body = row![self.view_compose(), self.view_board()].spacing(20);
            container(body).padding(20).into()
        } else {
            container(text(tipjar_core::controller::CONNECT_PROMPT).size(18).color(MUTED))
                .center_x(Fill)
                .center_y(Fill)
                .into()
        };

        let mut col = column![self.view_header(), styles::separator()];
        if let Some(notice) = self.view_notice() {
            col = col.push(notice);
        }
        col.push(content).into()
    }

    fn view_header(&self) -> Element<'_, Message> {
        let config = self.service.config();
        let title = text("Buy Me a Coffee").size(22).font(styles::BOLD);
        let chain_badge = container(text(config.chain.to_string()).size(12))
            .padding([2, 10])
            .style(styles::pill);

        let mut right = row![].spacing(10).align_y(iced::Alignment::Center);

        if let Some(address) = self.connected_address() {
            right = right
                .push(text(short_address(&address)).size(12).color(MUTED))
                .push(
                    button(text("Copy").size(11))
                        .style(styles::btn_ghost)
                        .on_press(Message::CopyAddress),
                );
        }

        match self.controller.affordance(self.identity.as_deref()) {
            Affordance::Hidden => {}
            Affordance::Connect => {
                right = right.push(
                    button(text("Connect Wallet").size(14))
                        .padding([8, 18])
                        .style(styles::btn_primary)
                        .on_press(Message::Connect),
                );
            }
            Affordance::Disconnect => {
                right = right.push(
                    button(text("Disconnect").size(14))
                        .padding([8, 18])
                        .style(styles::btn_secondary)
                        .on_press(Message::Disconnect),
                );
            }
            Affordance::Unavailable(reason) => {
                right = right.push(text(reason).size(12).color(MUTED)).push(
                    button(text("Connect Wallet").size(14))
                        .padding([8, 18])
                        .style(styles::btn_primary),
                );
            }
        }

        row![title, Space::new().width(10), chain_badge, Space::new().width(Fill), right]
            .padding(15)
            .align_y(iced::Alignment::Center)
            .into()
    }

    fn connected_address(&self) -> Option<tipjar_core::Address> {
        self.identity
            .as_deref()?
            .current_identity()?
            .account_with(tipjar_core::identity::ETHEREUM_WALLET)?
            .address
    }
}
