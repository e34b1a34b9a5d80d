#![deny(clippy::all, clippy::perf)]
#![warn(clippy::nursery, clippy::pedantic)]
#![allow(clippy::items_after_statements, clippy::module_name_repetitions)]

mod client;
mod config;
mod model;
mod navigation;
mod notice;
mod search;
mod storage;
mod store;
mod utils;
mod views;

use crate::{
    client::Client,
    config::Config,
    navigation::{History, Location, Route},
    storage::FileStorage,
    store::{Credentials, Favorites},
    utils::Result,
    views::{detail, favorites, settings, toasts, Detail, Search, Settings, Toasts},
};
use iced::{
    alignment::Horizontal, executor, Application, Command, Element, Length, Renderer, Theme,
};
use iced_native::widget::helpers::{button, container, horizontal_rule, text};
use std::{io, sync::Arc};
use tap::Pipe;
use tracing::{error, info};

pub fn main() -> iced::Result {
    let (non_blocking, _guard) = tracing_appender::non_blocking(io::stdout());
    tracing_subscriber::fmt()
        // ---
        .with_writer(non_blocking)
        .init();

    App::run(iced::Settings {
        window: iced::window::Settings {
            size: (1280, 860),
            min_size: Some((720, 480)),
            resizable: true,
            decorations: true,
            ..Default::default()
        },
        default_text_size: 17,
        text_multithreading: true,
        antialiasing: true,
        ..Default::default()
    })
}

#[derive(Debug, Clone)]
enum Message {
    Navigate(Location),
    Back,
    Forward,

    Search(views::search::Message),
    Detail(detail::Message),
    Favorites(favorites::Message),
    Settings(settings::Message),
    Toasts(toasts::Message),
}

#[derive(Debug)]
enum Page {
    Search,
    Detail(Detail),
    Favorites,
    Settings(Settings),
}

#[derive(Debug)]
struct Ready {
    client: Arc<Client>,
    credentials: Credentials<FileStorage>,
    favorites: Favorites<FileStorage>,

    history: History,
    search: Search,
    page: Page,
    toasts: Toasts,
}

#[derive(Debug)]
enum State {
    /// Nowhere to keep the key and favorites.
    Unavailable(utils::Error),
    Ready(Box<Ready>),
}

struct App {
    state: State,
}

impl Application for App
where
    Self: 'static,
{
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_: Self::Flags) -> (Self, Command<Self::Message>) {
        match Ready::open() {
            Ok((ready, command)) => (
                Self {
                    state: State::Ready(Box::new(ready)),
                },
                command,
            ),
            Err(error) => {
                error!(%error, "cannot open local storage");
                for cause in error.chain().skip(1) {
                    error!(%cause, "caused by");
                }
                (
                    Self {
                        state: State::Unavailable(error),
                    },
                    Command::none(),
                )
            }
        }
    }

    fn title(&self) -> String {
        match &self.state {
            State::Unavailable(_) => "Unavailable".to_owned(),
            State::Ready(ready) => match &ready.page {
                Page::Search => "Search".to_owned(),
                Page::Detail(detail) => detail
                    .recipe()
                    .map_or_else(|| "Recipe".to_owned(), |recipe| recipe.title.clone()),
                Page::Favorites => "Favorites".to_owned(),
                Page::Settings(_) => "Settings".to_owned(),
            },
        }
        .pipe(|str| format!("Recipe Explorer - {str}"))
    }

    fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
        match &mut self.state {
            State::Unavailable(_) => Command::none(),
            State::Ready(ready) => ready.update(message),
        }
    }

    fn view(&self) -> Element<'_, Self::Message, Renderer<Self::Theme>> {
        match &self.state {
            State::Unavailable(error) => container(
                text(format!("Recipe Explorer cannot start: {error}"))
                    .horizontal_alignment(Horizontal::Center),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .into(),
            State::Ready(ready) => ready.view(),
        }
    }

    fn theme(&self) -> Self::Theme {
        Self::Theme::Dark
    }
}

impl Ready {
    fn open() -> Result<(Self, Command<Message>)> {
        let config = Config::load()?;
        let storage = FileStorage::open(&config.data_dir)?;
        info!(dir = %storage.dir().display(), "using local storage");
        Ok(Self::new(&config, storage))
    }

    fn new(config: &Config, storage: FileStorage) -> (Self, Command<Message>) {
        let client = Arc::new(Client::new(&config.api, reqwest::Client::new()));
        let credentials = Credentials::open(storage.clone());
        let (favorites, load_error) = Favorites::open(storage);

        let mut toasts = Toasts::default();
        if let Some(error) = &load_error {
            toasts.push(error.into());
        }

        let mut ready = Self {
            search: Search::new(Arc::clone(&client), config.page_size),
            client,
            credentials,
            favorites,
            history: History::new(Location::default()),
            page: Page::Search,
            toasts,
        };
        let command = ready.show_current();
        (ready, command)
    }

    /// Builds the page for the current location.
    fn show_current(&mut self) -> Command<Message> {
        let key = self.credentials.get();
        info!(location = %self.history.current(), "showing");

        match self.history.current().route() {
            Route::Search(criteria) => {
                self.page = Page::Search;
                self.search.on_location(criteria, key).map(Message::Search)
            }
            Route::Recipe(id) => {
                let (detail, command) = Detail::new(Arc::clone(&self.client), id, key);
                self.page = Page::Detail(detail);
                command.map(Message::Detail)
            }
            Route::Favorites => {
                self.page = Page::Favorites;
                Command::none()
            }
            Route::Settings => {
                self.page = Page::Settings(Settings::new(key));
                Command::none()
            }
        }
    }

    fn step(&mut self, step: fn(&mut History) -> Option<&Location>) -> Command<Message> {
        if step(&mut self.history).is_some() {
            self.show_current()
        } else {
            Command::none()
        }
    }

    fn navigate(&mut self, location: Location) -> Command<Message> {
        if self.history.push(location) {
            self.show_current()
        } else {
            Command::none()
        }
    }

    fn toggle_favorite(&mut self, recipe: model::Recipe) {
        match self.favorites.toggle(recipe) {
            Ok(Some(notice)) => self.toasts.push(notice),
            Ok(None) => {}
            Err(error) => self.toasts.push((&error).into()),
        }
    }

    fn remove_favorite(&mut self, id: u64) {
        match self.favorites.remove(id) {
            Ok(Some(notice)) => self.toasts.push(notice),
            Ok(None) => {}
            Err(error) => self.toasts.push((&error).into()),
        }
    }

    fn save_key(&mut self) -> Command<Message> {
        let Page::Settings(settings) = &self.page else {
            return Command::none();
        };
        let input = settings.input().to_owned();

        match self.credentials.set(&input) {
            Ok(notice) => {
                self.toasts.push(notice);
                self.navigate(Location::default())
            }
            Err(error) => {
                self.toasts.push((&error).into());
                Command::none()
            }
        }
    }

    fn clear_key(&mut self) -> Command<Message> {
        match self.credentials.clear() {
            Ok(notice) => {
                self.toasts.push(notice);
                if let Page::Settings(settings) = &mut self.page {
                    settings.cleared();
                }
                self.search.on_credential(None).map(Message::Search)
            }
            Err(error) => {
                self.toasts.push((&error).into());
                Command::none()
            }
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Navigate(location)
            | Message::Search(views::search::Message::Navigate(location))
            | Message::Detail(detail::Message::Navigate(location))
            | Message::Favorites(favorites::Message::Navigate(location)) => self.navigate(location),
            Message::Back | Message::Detail(detail::Message::Back) => self.step(History::back),
            Message::Forward => self.step(History::forward),

            Message::Search(views::search::Message::ToggleFavorite(recipe))
            | Message::Detail(detail::Message::ToggleFavorite(recipe)) => {
                self.toggle_favorite(recipe);
                Command::none()
            }
            Message::Favorites(favorites::Message::Remove(id)) => {
                self.remove_favorite(id);
                Command::none()
            }

            Message::Search(message) => self
                .search
                .update(message, &mut self.toasts)
                .map(Message::Search),
            Message::Detail(message) => match &mut self.page {
                Page::Detail(detail) => detail.update(message, &mut self.toasts).map(Message::Detail),
                _ => Command::none(),
            },

            Message::Settings(settings::Message::Save) => self.save_key(),
            Message::Settings(settings::Message::ConfirmRemove) => self.clear_key(),
            Message::Settings(message) => {
                if let Page::Settings(settings) = &mut self.page {
                    settings.update(message);
                }
                Command::none()
            }

            Message::Toasts(message) => {
                self.toasts.update(message);
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message, Renderer<Theme>> {
        let nav = |label: String, location: Location| {
            button(text(label)).on_press(Message::Navigate(location))
        };

        let header = row![
            text("Recipe Explorer").size(26).width(Length::Fill),
            button("<")
                .pipe(|b| if self.history.can_go_back() { b.on_press(Message::Back) } else { b }),
            button(">").pipe(|b| {
                if self.history.can_go_forward() {
                    b.on_press(Message::Forward)
                } else {
                    b
                }
            }),
            nav("Search".to_owned(), Location::default()),
            nav(
                format!("Favorites ({})", self.favorites.list().len()),
                Location::favorites()
            ),
            nav("Settings".to_owned(), Location::settings()),
        ]
        .spacing(10)
        .padding(10);

        let page = match &self.page {
            Page::Search => self
                .search
                .view(|id| self.favorites.contains(id))
                .map(Message::Search),
            Page::Detail(detail) => {
                let favorite = detail
                    .recipe()
                    .map_or(false, |recipe| self.favorites.contains(recipe.id));
                detail.view(favorite).map(Message::Detail)
            }
            Page::Favorites => favorites::view(self.favorites.list()).map(Message::Favorites),
            Page::Settings(settings) => settings.view().map(Message::Settings),
        };

        columee![
            header,
            horizontal_rule(1),
            if self.toasts.notices().is_empty() {
                views::empty()
            } else {
                container(self.toasts.view().map(Message::Toasts))
                    .padding(10)
                    .into()
            },
            container(page).height(Length::Fill),
        ]
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::parse_criteria;

    fn ready(dir: &std::path::Path) -> Ready {
        let config = Config {
            api: "http://localhost".to_owned(),
            data_dir: dir.to_owned(),
            page_size: 12,
        };
        let storage = FileStorage::open(dir).unwrap();
        Ready::new(&config, storage).0
    }

    #[test]
    fn recipe_back_replays_the_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut ready = ready(dir.path());
        let results = Location::search(&parse_criteria("query=chicken&diet=vegan&offset=12"));

        let _ = ready.update(Message::Navigate(results.clone()));
        let _ = ready.update(Message::Navigate(Location::recipe(716_429)));
        assert!(matches!(ready.page, Page::Detail(_)));

        let _ = ready.update(Message::Detail(detail::Message::Back));
        assert_eq!(ready.history.current(), &results);
        assert!(matches!(ready.page, Page::Search));
        assert!(ready.history.can_go_forward());
    }

    #[test]
    fn back_at_the_start_stays_put() {
        let dir = tempfile::tempdir().unwrap();
        let mut ready = ready(dir.path());

        let _ = ready.update(Message::Back);
        assert_eq!(ready.history.current(), &Location::default());
        assert!(matches!(ready.page, Page::Search));
    }
}
