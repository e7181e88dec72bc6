use iced::font::Weight;
use iced::widget::{button, container, Space};
use iced::{Background, Border, Color, Element, Fill, Font, Shadow, Vector};

use crate::{ACTIVE, BORDER, MUTED, PRIMARY, SURFACE};

// -- Additional palette --

pub const SUCCESS: Color = Color::from_rgb(0.357, 0.718, 0.435);
pub const DANGER: Color = Color::from_rgb(0.906, 0.192, 0.192);

// -- Fonts --

pub const BOLD: Font = Font {
    weight: Weight::Bold,
    ..Font::DEFAULT
};

// -- Container styles --

pub fn card(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(SURFACE)),
        border: Border {
            color: BORDER,
            width: 1.0,
            radius: 12.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.15),
            offset: Vector::new(0.0, 2.0),
            blur_radius: 8.0,
        },
        ..Default::default()
    }
}

pub fn card_flat(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(SURFACE)),
        border: Border {
            color: BORDER,
            width: 1.0,
            radius: 12.0.into(),
        },
        ..Default::default()
    }
}

pub fn pill(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(ACTIVE)),
        border: Border {
            radius: 20.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Banner behind a success or error notice.
pub fn notice(is_error: bool) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| {
        let tint = if is_error { DANGER } else { SUCCESS };
        container::Style {
            background: Some(Background::Color(Color { a: 0.12, ..tint })),
            text_color: Some(tint),
            border: Border {
                color: Color { a: 0.3, ..tint },
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        }
    }
}

// -- Button styles --

pub fn btn_primary(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let base = button::Style {
        text_color: Color::WHITE,
        border: Border {
            radius: 8.0.into(),
            ..Default::default()
        },
        ..Default::default()
    };

    match status {
        button::Status::Active => button::Style {
            background: Some(Background::Color(PRIMARY)),
            shadow: Shadow {
                color: Color::from_rgba(0.835, 0.537, 0.212, 0.25),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 6.0,
            },
            ..base
        },
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(Color::from_rgb(0.898, 0.608, 0.286))),
            shadow: Shadow {
                color: Color::from_rgba(0.835, 0.537, 0.212, 0.4),
                offset: Vector::new(0.0, 3.0),
                blur_radius: 10.0,
            },
            ..base
        },
        button::Status::Pressed => button::Style {
            background: Some(Background::Color(Color::from_rgb(0.722, 0.447, 0.149))),
            ..base
        },
        button::Status::Disabled => button::Style {
            background: Some(Background::Color(Color::from_rgb(0.220, 0.184, 0.161))),
            text_color: Color::from_rgba(1.0, 1.0, 1.0, 0.35),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        },
    }
}

pub fn btn_secondary(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let base_border = Border {
        color: BORDER,
        width: 1.0,
        radius: 8.0.into(),
    };

    match status {
        button::Status::Active => button::Style {
            background: Some(Background::Color(Color::TRANSPARENT)),
            text_color: Color::from_rgb(0.85, 0.87, 0.90),
            border: base_border,
            ..Default::default()
        },
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(ACTIVE)),
            text_color: Color::WHITE,
            border: base_border,
            ..Default::default()
        },
        button::Status::Pressed => button::Style {
            background: Some(Background::Color(SURFACE)),
            text_color: Color::WHITE,
            border: base_border,
            ..Default::default()
        },
        button::Status::Disabled => button::Style {
            text_color: Color::from_rgba(1.0, 1.0, 1.0, 0.3),
            border: Border {
                color: Color::from_rgba(0.259, 0.212, 0.180, 0.5),
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        },
    }
}

pub fn btn_ghost(_theme: &iced::Theme, status: button::Status) -> button::Style {
    match status {
        button::Status::Active => button::Style {
            background: None,
            text_color: Color::from_rgb(0.85, 0.87, 0.90),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        },
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.05))),
            text_color: Color::WHITE,
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        },
        _ => button::Style {
            text_color: MUTED,
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        },
    }
}

// -- Helpers --

pub fn separator<'a, M: 'a>() -> Element<'a, M> {
    container(Space::new())
        .width(Fill)
        .height(1)
        .style(|_theme| container::Style {
            background: Some(Background::Color(Color::from_rgba(
                0.204, 0.259, 0.337, 0.5,
            ))),
            ..Default::default()
        })
        .into()
}
