use crate::{columee, row, store::ApiKey};
use iced::{Element, Length};
use iced_native::widget::helpers::{button, container, horizontal_rule, text, text_input};

const INSTRUCTIONS: &str = "\
To use this app, you'll need a Spoonacular API key. You can get a free key by:

1. Creating an account at the Spoonacular API Portal (https://spoonacular.com/food-api)
2. Going to your profile after login
3. Clicking on \"API Console\"
4. Copying your API key and pasting it below

The free plan allows 150 requests per day, which should be enough for personal use.";

#[derive(Debug, Clone)]
pub enum Message {
    InputChanged(String),
    /// Handled by the app, which owns the credential store.
    Save,
    Remove,
    CancelRemove,
    /// Handled by the app.
    ConfirmRemove,
}

#[derive(Debug, Default)]
pub struct Settings {
    input: String,
    /// Remove was clicked once and waits for confirmation.
    confirming: bool,
    saved: bool,
}

impl Settings {
    pub fn new(key: Option<&ApiKey>) -> Self {
        Self {
            input: key.map(|key| key.expose().to_owned()).unwrap_or_default(),
            confirming: false,
            saved: key.is_some(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::InputChanged(input) => self.input = input,
            Message::Remove => self.confirming = true,
            Message::CancelRemove => self.confirming = false,
            Message::Save | Message::ConfirmRemove => {}
        }
    }

    /// The stored key went away.
    pub fn cleared(&mut self) {
        *self = Self::default();
    }

    pub fn view(&self) -> Element<'_, Message> {
        let status = if self.saved {
            "An API key is saved on this machine."
        } else {
            "No API key saved yet."
        };

        let remove: Element<'_, Message> = match (self.saved, self.confirming) {
            (false, _) => text("").into(),
            (true, false) => button("Remove key").on_press(Message::Remove).into(),
            (true, true) => row![
                text("Are you sure you want to remove your API key?"),
                button("Remove").on_press(Message::ConfirmRemove),
                button("Cancel").on_press(Message::CancelRemove),
            ]
            .spacing(10)
            .into(),
        };

        container(
            columee![
                text("API Key Settings").size(28),
                text("Manage your Spoonacular API key").size(16),
                text(status),
                row![
                    text_input("Enter your API key", &self.input, Message::InputChanged)
                        .password()
                        .on_submit(Message::Save)
                        .padding(8),
                    button("Save").on_press(Message::Save),
                ]
                .spacing(10),
                remove,
                horizontal_rule(1),
                text(INSTRUCTIONS).size(15),
            ]
            .spacing(14),
        )
        .max_width(720)
        .width(Length::Fill)
        .padding(20)
        .into()
    }
}
