use crate::{
    client::{ApiError, Client},
    columee,
    model::{choice, Choice, Recipe, SearchPage, CUISINES, DIETS, MEAL_TYPES},
    navigation::Location,
    notice::Notice,
    row,
    search::{handle_filter_change, handle_search, Criteria, Filters, Search as Controller, State},
    store::ApiKey,
    views::{empty, Toasts},
};
use futures::future::join_all;
use iced::{alignment::Horizontal, Element, Length};
use iced_native::{
    image,
    widget::helpers::{button, column, container, image, pick_list, scrollable, text, text_input},
    Command,
};
use std::{collections::HashMap, sync::Arc};
use tracing::warn;

#[derive(Debug, Clone)]
pub enum Message {
    InputChanged(String),
    Page(u64, Result<SearchPage, ApiError>),
    Thumbnails(Vec<(u64, image::Handle)>),

    /// Handled by the app: favorites live there.
    ToggleFavorite(Recipe),
    /// Handled by the app: every search change is a new location.
    Navigate(Location),
}

#[derive(Debug)]
pub struct Search {
    controller: Controller,
    /// Criteria of the location being shown.
    criteria: Criteria,
    input: String,
    thumbnails: HashMap<u64, image::Handle>,

    client: Arc<Client>,
}

fn with_any(label: &'static str, options: &'static [Choice]) -> Vec<Choice> {
    std::iter::once(Choice { id: "", label })
        .chain(options.iter().copied())
        .collect()
}

fn selected_id(choice: &Choice) -> Option<String> {
    (!choice.id.is_empty()).then(|| choice.id.to_owned())
}

impl Search {
    pub fn new(client: Arc<Client>, page_size: usize) -> Self {
        Self {
            controller: Controller::new(page_size),
            criteria: Criteria::default(),
            input: String::new(),
            thumbnails: HashMap::new(),
            client,
        }
    }

    /// The search page was shown for `criteria`, or the API key changed.
    pub fn on_location(&mut self, criteria: Criteria, key: Option<&ApiKey>) -> Command<Message> {
        self.input = criteria.query.clone().unwrap_or_default();
        let pending = self.controller.on_location(&criteria, key.is_some());
        self.criteria = criteria;

        let (Some(pending), Some(key)) = (pending, key.cloned()) else {
            return Command::none();
        };
        let client = Arc::clone(&self.client);
        Command::perform(
            async move {
                let result = client.search_recipes(Some(&key), &pending.request).await;
                (pending.seq, result)
            },
            |(seq, result)| Message::Page(seq, result),
        )
    }

    pub fn on_credential(&mut self, key: Option<&ApiKey>) -> Command<Message> {
        self.on_location(self.criteria.clone(), key)
    }

    pub fn update(&mut self, message: Message, toasts: &mut Toasts) -> Command<Message> {
        match message {
            Message::InputChanged(input) => {
                self.input = input;
                Command::none()
            }
            Message::Page(seq, result) => match self.controller.on_response(seq, result) {
                Ok(()) => self.fetch_thumbnails(),
                Err(error) => {
                    toasts.push(Notice::error(&error));
                    Command::none()
                }
            },
            Message::Thumbnails(thumbnails) => {
                self.thumbnails.extend(thumbnails);
                Command::none()
            }
            Message::ToggleFavorite(_) | Message::Navigate(_) => Command::none(),
        }
    }

    fn fetch_thumbnails(&mut self) -> Command<Message> {
        let recipes = self.controller.recipes();
        self.thumbnails
            .retain(|id, _| recipes.iter().any(|recipe| recipe.id == *id));

        let missing: Vec<_> = recipes
            .iter()
            .filter(|recipe| !recipe.image.is_empty() && !self.thumbnails.contains_key(&recipe.id))
            .map(|recipe| (recipe.id, recipe.image.clone()))
            .collect();
        if missing.is_empty() {
            return Command::none();
        }

        let client = Arc::clone(&self.client);
        Command::perform(
            async move {
                let fetches = missing.into_iter().map(|(id, url)| {
                    let client = Arc::clone(&client);
                    async move {
                        match client.image_bytes(&url).await {
                            Ok(bytes) => Some((id, image::Handle::from_memory(bytes.to_vec()))),
                            Err(error) => {
                                warn!(%error, id, "thumbnail unavailable");
                                None
                            }
                        }
                    }
                });
                join_all(fetches).await.into_iter().flatten().collect()
            },
            Message::Thumbnails,
        )
    }

    pub fn view(&self, is_favorite: impl Fn(u64) -> bool) -> Element<'_, Message> {
        let submit = Message::Navigate(Location::search(&handle_search(&self.criteria, &self.input)));
        let search_bar = row![
            text_input(
                "Search by ingredients (e.g., chicken, tomato)",
                &self.input,
                Message::InputChanged,
            )
            .on_submit(submit.clone())
            .padding(8),
            button("Search").on_press(submit),
        ]
        .spacing(10);

        columee![search_bar, self.filters(), self.content(is_favorite)]
            .spacing(20)
            .padding(20)
            .into()
    }

    fn filters(&self) -> Element<'_, Message> {
        let filter = |label: &'static str,
                      options: &'static [Choice],
                      current: &Option<String>,
                      apply: fn(&mut Filters, Option<String>)| {
            let any = Choice { id: "", label };
            let selected = current
                .as_deref()
                .and_then(|id| choice(options, id))
                .unwrap_or(any);
            let criteria = self.criteria.clone();
            pick_list(with_any(label, options), Some(selected), move |picked: Choice| {
                let mut filters = criteria.filters();
                apply(&mut filters, selected_id(&picked));
                Message::Navigate(Location::search(&handle_filter_change(&criteria, filters)))
            })
        };

        let clear = Message::Navigate(Location::search(&handle_filter_change(
            &self.criteria,
            Filters::default(),
        )));

        row![
            filter("Any diet", DIETS, &self.criteria.diet, |f, v| f.diet = v),
            filter("Any cuisine", CUISINES, &self.criteria.cuisine, |f, v| f.cuisine = v),
            filter("Any meal type", MEAL_TYPES, &self.criteria.meal_type, |f, v| f.meal_type = v),
            button("Clear filters").on_press(clear),
        ]
        .spacing(10)
        .into()
    }

    fn content(&self, is_favorite: impl Fn(u64) -> bool) -> Element<'_, Message> {
        let recipes = self.controller.recipes();
        match self.controller.state() {
            State::NoCredential => empty_state(
                "API Key Required",
                "To use Recipe Explorer, you need to add your Spoonacular API key in the settings.",
                Some(("Go to Settings", Message::Navigate(Location::settings()))),
            ),
            State::Idle => empty_state(
                "Find Your Next Meal",
                "Search by ingredients to discover recipes you can make with what you have.",
                None,
            ),
            State::Searching if recipes.is_empty() => text("Loading...").into(),
            State::Results if recipes.is_empty() => empty_state(
                "No Recipes Found",
                "Try adjusting your search or filters to find more recipes.",
                None,
            ),
            State::Searching | State::Results => {
                let cards = recipes
                    .iter()
                    .map(|recipe| self.card(recipe, is_favorite(recipe.id)))
                    .collect();

                let more: Element<'_, Message> = if !self.controller.has_more() {
                    empty()
                } else if self.controller.state() == State::Searching {
                    button("Loading...").into()
                } else {
                    let next = self.controller.load_more(&self.criteria);
                    button("Load More")
                        .on_press(Message::Navigate(Location::search(&next)))
                        .into()
                };

                scrollable(
                    columee![
                        text(format!("{} of {} recipes", recipes.len(), self.controller.total())),
                        column(cards).spacing(8),
                        container(more).width(Length::Fill).center_x(),
                    ]
                    .spacing(10),
                )
                .height(Length::Fill)
                .into()
            }
        }
    }

    fn card<'a>(&'a self, recipe: &'a Recipe, favorite: bool) -> Element<'a, Message> {
        let thumbnail: Element<'a, Message> = match self.thumbnails.get(&recipe.id) {
            Some(handle) => image(handle.clone()).width(Length::Units(120)).into(),
            None => container(empty()).width(Length::Units(120)).into(),
        };

        let facts = [
            recipe.ready_in_minutes.map(|minutes| format!("{minutes} min")),
            recipe.servings.map(|servings| format!("{servings} servings")),
            recipe.rating().map(|rating| format!("{rating}/10")),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");

        row![
            thumbnail,
            columee![text(&recipe.title).size(20), text(facts)]
                .spacing(4)
                .width(Length::Fill),
            button(if favorite { "Unfavorite" } else { "Favorite" })
                .on_press(Message::ToggleFavorite(recipe.clone())),
            button("Open").on_press(Message::Navigate(Location::recipe(recipe.id))),
        ]
        .spacing(12)
        .into()
    }
}

/// Title, description and an optional action, centered.
pub fn empty_state<'a, M: Clone + 'a>(
    title: &str,
    description: &str,
    action: Option<(&str, M)>,
) -> Element<'a, M> {
    let action: Element<'a, M> = match action {
        Some((label, message)) => button(text(label)).on_press(message).into(),
        None => empty(),
    };

    container(
        columee![
            text(title).size(28).horizontal_alignment(Horizontal::Center),
            text(description).horizontal_alignment(Horizontal::Center),
            action,
        ]
        .spacing(12)
        .align_items(iced::Alignment::Center),
    )
    .width(Length::Fill)
    .center_x()
    .padding(40)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::parse_criteria;

    fn search() -> Search {
        let client = Client::new("http://localhost", reqwest::Client::new());
        Search::new(Arc::new(client), 12)
    }

    #[test]
    fn any_entry_clears_the_filter() {
        let options = with_any("Any diet", DIETS);

        assert_eq!(options.len(), DIETS.len() + 1);
        assert_eq!(options[0].label, "Any diet");
        assert_eq!(selected_id(&options[0]), None);
        assert_eq!(selected_id(&options[1]), Some(DIETS[0].id.to_owned()));
    }

    #[test]
    fn location_fills_the_search_box() {
        let mut search = search();
        let key = ApiKey::new("k");

        let _ = search.on_location(parse_criteria("query=tomato&diet=vegan"), key.as_ref());
        assert_eq!(search.input, "tomato");
        assert_eq!(search.controller.state(), State::Searching);

        let _ = search.on_credential(None);
        assert_eq!(search.controller.state(), State::NoCredential);
    }

    #[test]
    fn failed_page_becomes_a_notice() {
        let mut search = search();
        let key = ApiKey::new("k");
        let mut toasts = Toasts::default();

        let _ = search.on_location(parse_criteria("query=tomato"), key.as_ref());
        let _ = search.update(Message::Page(1, Err(ApiError::QuotaExceeded)), &mut toasts);

        assert_eq!(toasts.notices(), [Notice::error(ApiError::QuotaExceeded)]);
        assert!(search.controller.recipes().is_empty());
    }
}
