use crate::{
    columee,
    model::Recipe,
    navigation::Location,
    row,
    views::search::empty_state,
};
use iced::{Element, Length};
use iced_native::widget::helpers::{button, column, scrollable, text};

#[derive(Debug, Clone)]
pub enum Message {
    Remove(u64),
    Navigate(Location),
}

/// Saved recipes. Holds nothing: the list comes from the favorites store.
pub fn view(favorites: &[Recipe]) -> Element<'_, Message> {
    if favorites.is_empty() {
        return empty_state(
            "No Favorites Yet",
            "Recipes you save will appear here.",
            Some(("Find recipes", Message::Navigate(Location::default()))),
        );
    }

    let line = |recipe: &Recipe| {
        let facts = recipe
            .ready_in_minutes
            .map(|minutes| format!("{minutes} min"))
            .unwrap_or_default();

        row![
            columee![text(&recipe.title).size(20), text(facts).size(14)].width(Length::Fill),
            button("Open").on_press(Message::Navigate(Location::recipe(recipe.id))),
            button("Remove").on_press(Message::Remove(recipe.id)),
        ]
        .spacing(12)
        .into()
    };

    columee![
        text(format!("Favorites ({})", favorites.len())).size(28),
        scrollable(column(favorites.iter().map(line).collect()).spacing(8)).height(Length::Fill),
    ]
    .spacing(16)
    .padding(20)
    .into()
}
