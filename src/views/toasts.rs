use crate::{
    notice::{Level, Notice},
    row,
};
use hex_colors::color_from_hex;
use iced::{Color, Element, Length};
use iced_native::widget::helpers::{button, column, container, text};

macro_rules! hex {
    ($($tt:tt)*) => {{
        let [r, g, b]: [u8; 3] = color_from_hex!($($tt)*);
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }};
}

const BLUE: Color = hex!(0x3b82f6);
pub(super) const GREEN: Color = hex!("22c55e");
pub(super) const AMBER: Color = hex!(0xf59e0b);
pub(super) const RED: Color = hex!("#ef4444");

const fn color(level: Level) -> Color {
    match level {
        Level::Info => BLUE,
        Level::Success => GREEN,
        Level::Warn => AMBER,
        Level::Error => RED,
    }
}

/// How many notices stay on screen.
const VISIBLE: usize = 4;

#[derive(Debug, Clone)]
pub enum Message {
    Dismiss(usize),
    DismissAll,
}

/// Latest user notices, newest first on screen.
#[derive(Debug, Default)]
pub struct Toasts(Vec<Notice>);

impl Toasts {
    pub fn push(&mut self, notice: Notice) {
        match notice.level {
            Level::Error => tracing::error!(%notice, "notice"),
            Level::Warn => tracing::warn!(%notice, "notice"),
            Level::Info | Level::Success => tracing::info!(%notice, "notice"),
        }
        self.0.push(notice);
        if self.0.len() > VISIBLE {
            self.0.remove(0);
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Dismiss(index) if index < self.0.len() => {
                self.0.remove(index);
            }
            Message::Dismiss(_) => {}
            Message::DismissAll => self.0.clear(),
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.0
    }

    pub fn view(&self) -> Element<'_, Message> {
        let toast = |(index, notice): (usize, &Notice)| {
            row![
                container(text(&notice.message).style(color(notice.level))).width(Length::Fill),
                button(text("x")).on_press(Message::Dismiss(index)),
            ]
            .spacing(10)
            .into()
        };

        let mut toasts: Vec<Element<'_, Message>> = self.0.iter().enumerate().rev().map(toast).collect();
        if self.0.len() > 1 {
            toasts.push(button(text("Dismiss all")).on_press(Message::DismissAll).into());
        }

        column(toasts).spacing(4).width(Length::Fill).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_latest_notices() {
        let mut toasts = Toasts::default();
        for n in 0..6 {
            toasts.push(Notice::info(n));
        }

        let messages: Vec<_> = toasts.notices().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["2", "3", "4", "5"]);
    }

    #[test]
    fn dismisses_by_index() {
        let mut toasts = Toasts::default();
        toasts.push(Notice::error("API error: 500"));
        toasts.push(Notice::success("API key saved successfully"));

        toasts.update(Message::Dismiss(0));
        toasts.update(Message::Dismiss(9));
        assert_eq!(toasts.notices(), [Notice::success("API key saved successfully")]);

        toasts.update(Message::DismissAll);
        assert!(toasts.notices().is_empty());
    }

    #[test]
    fn colors_follow_levels() {
        assert_eq!(color(Level::Error), RED);
        assert!((GREEN.g - 197.0 / 255.0).abs() < f32::EPSILON);
    }
}
