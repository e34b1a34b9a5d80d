use crate::{
    client::{ApiError, Client},
    columee,
    model::{HealthBand, Recipe},
    navigation::Location,
    notice::Notice,
    row,
    store::ApiKey,
    utils::{html, Result},
    views::{empty, search::empty_state, toasts, Toasts},
};
use iced::{Color, Element, Length};
use iced_native::{
    image,
    widget::helpers::{button, container, horizontal_rule, image, scrollable, text},
    Command,
};
use std::sync::Arc;
use tap::Pipe;
use tracing::warn;

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(u64, Result<Recipe, ApiError>),
    Picture(u64, Option<image::Handle>),

    ToggleFavorite(Recipe),
    Navigate(Location),
    /// Back in history, to wherever the recipe was opened from.
    Back,
}

#[derive(Debug)]
enum State {
    Loading(u64),
    Ready {
        recipe: Box<Recipe>,
        picture: Option<image::Handle>,
    },
    Missing,
}

#[derive(Debug)]
pub struct Detail {
    state: State,
    client: Arc<Client>,
}

const fn band_color(band: HealthBand) -> Color {
    match band {
        HealthBand::Good => toasts::GREEN,
        HealthBand::Fair => toasts::AMBER,
        HealthBand::Poor => toasts::RED,
    }
}

const fn band_label(band: HealthBand) -> &'static str {
    match band {
        HealthBand::Good => "good",
        HealthBand::Fair => "fair",
        HealthBand::Poor => "poor",
    }
}

impl Detail {
    async fn fetch_picture(client: Arc<Client>, url: String) -> Option<image::Handle> {
        client
            .image_bytes(&url)
            .await
            .map(|b| b.as_ref().to_vec())
            .map(image::Handle::from_memory)
            .map_err(|error| warn!(%error, %url, "recipe picture unavailable"))
            .ok()
    }

    pub fn new(client: Arc<Client>, id: u64, key: Option<&ApiKey>) -> (Self, Command<Message>) {
        let key = key.cloned();
        let fetch = {
            let client = Arc::clone(&client);
            Command::perform(
                async move { client.recipe(key.as_ref(), id).await },
                move |result| Message::Loaded(id, result),
            )
        };
        (Self { state: State::Loading(id), client }, fetch)
    }

    pub fn update(&mut self, message: Message, toasts: &mut Toasts) -> Command<Message> {
        match message {
            Message::Loaded(id, result) if matches!(self.state, State::Loading(loading) if loading == id) => {
                match result {
                    Ok(recipe) => {
                        let fetch = if recipe.image.is_empty() {
                            Command::none()
                        } else {
                            Command::perform(
                                Self::fetch_picture(Arc::clone(&self.client), recipe.image.clone()),
                                move |picture| Message::Picture(id, picture),
                            )
                        };
                        self.state = State::Ready {
                            recipe: Box::new(recipe),
                            picture: None,
                        };
                        fetch
                    }
                    Err(error) => {
                        toasts.push(Notice::error(&error));
                        self.state = State::Missing;
                        Command::none()
                    }
                }
            }
            Message::Picture(id, Some(handle)) => {
                if let State::Ready { recipe, picture } = &mut self.state {
                    if recipe.id == id {
                        *picture = Some(handle);
                    }
                }
                Command::none()
            }
            _ => Command::none(),
        }
    }

    /// Recipe on screen, if it loaded.
    pub fn recipe(&self) -> Option<&Recipe> {
        match &self.state {
            State::Ready { recipe, .. } => Some(recipe.as_ref()),
            State::Loading(_) | State::Missing => None,
        }
    }

    pub fn view(&self, favorite: bool) -> Element<'_, Message> {
        let back = button("Back").on_press(Message::Back);

        let body = match &self.state {
            State::Loading(_) => text("Loading...").into(),
            State::Missing => empty_state(
                "Recipe Not Found",
                "The recipe you're looking for doesn't exist or couldn't be loaded.",
                Some(("Back to search", Message::Navigate(Location::default()))),
            ),
            State::Ready { recipe, picture } => Self::ready(recipe, picture.as_ref(), favorite),
        };

        columee![back, body].spacing(16).padding(20).into()
    }

    fn ready<'a>(
        recipe: &'a Recipe,
        picture: Option<&image::Handle>,
        favorite: bool,
    ) -> Element<'a, Message> {
        let picture: Element<'a, Message> = match picture {
            Some(handle) => image(handle.clone()).width(Length::Units(480)).into(),
            None => empty(),
        };

        let facts: Vec<Element<'a, Message>> = [
            recipe.ready_in_minutes.map(|minutes| format!("Ready in {minutes} minutes")),
            recipe.servings.map(|servings| format!("{servings} servings")),
            recipe.rating().map(|rating| format!("Score {rating}/10")),
            recipe.price_label(),
            recipe.likes.map(|likes| format!("{likes} likes")),
        ]
        .into_iter()
        .flatten()
        .map(|fact| text(fact).into())
        .collect();
        let facts = facts.pipe(iced::widget::Row::with_children).spacing(20);

        let tags = recipe.tags().collect::<Vec<_>>().join(", ");

        let health: Element<'a, Message> = match (recipe.health_score, recipe.health_band()) {
            (Some(score), Some(band)) => text(format!(
                "Health score: {score:.0} ({})",
                band_label(band)
            ))
            .style(band_color(band))
            .into(),
            _ => empty(),
        };

        let section = |title: &str, html_text: Option<&String>| -> Element<'a, Message> {
            match html_text.map(|html_text| html::to_plain_text(html_text)) {
                Some(plain) if !plain.is_empty() => {
                    columee![text(title).size(24), text(plain)].spacing(8).into()
                }
                _ => empty(),
            }
        };

        let source: Element<'a, Message> = match &recipe.source_url {
            Some(url) => text(format!("Source: {url}")).size(14).into(),
            None => empty(),
        };

        scrollable(
            columee![
                row![
                    text(&recipe.title).size(32).width(Length::Fill),
                    button(if favorite { "Remove from favorites" } else { "Add to favorites" })
                        .on_press(Message::ToggleFavorite(recipe.clone())),
                ]
                .spacing(12),
                container(picture).width(Length::Fill).center_x(),
                facts,
                text(tags).size(14),
                health,
                horizontal_rule(1),
                section("Summary", recipe.summary.as_ref()),
                section("Instructions", recipe.instructions.as_ref()),
                source,
            ]
            .spacing(14),
        )
        .height(Length::Fill)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: u64) -> Detail {
        let client = Arc::new(Client::new("http://localhost", reqwest::Client::new()));
        Detail::new(client, id, None).0
    }

    fn recipe(id: u64) -> Recipe {
        json::from_value(json::json!({ "id": id, "title": "Shakshuka", "image": "" }))
            .expect("valid recipe")
    }

    #[test]
    fn shows_the_loaded_recipe() {
        let mut detail = detail(7);
        let mut toasts = Toasts::default();

        detail.update(Message::Loaded(7, Ok(recipe(7))), &mut toasts);
        assert_eq!(detail.recipe().map(|r| r.title.as_str()), Some("Shakshuka"));
        assert!(toasts.notices().is_empty());
    }

    #[test]
    fn missing_recipe_becomes_not_found() {
        let mut detail = detail(7);
        let mut toasts = Toasts::default();

        detail.update(Message::Loaded(7, Err(ApiError::NotFound)), &mut toasts);
        assert!(detail.recipe().is_none());
        assert!(matches!(detail.state, State::Missing));
        assert_eq!(toasts.notices(), [Notice::error("Recipe not found.")]);
    }

    #[test]
    fn ignores_responses_for_another_recipe() {
        let mut detail = detail(7);
        let mut toasts = Toasts::default();

        detail.update(Message::Loaded(8, Ok(recipe(8))), &mut toasts);
        assert!(matches!(detail.state, State::Loading(7)));
    }
}
