use crate::search::{criteria_to_query, parse_criteria, Criteria};
use std::fmt::{Display, Formatter};

/// Where the user is: a path plus a query string, like a browser address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search(Criteria),
    Recipe(u64),
    Favorites,
    Settings,
}

impl Location {
    pub fn parse(address: &str) -> Self {
        let (path, query) = address.split_once('?').unwrap_or((address, ""));
        let path = format!("/{}", path.trim_matches('/'));
        Self {
            path,
            query: query.to_owned(),
        }
    }

    pub fn search(criteria: &Criteria) -> Self {
        Self {
            path: "/".to_owned(),
            query: criteria_to_query(criteria),
        }
    }

    pub fn recipe(id: u64) -> Self {
        Self::parse(&format!("/recipe/{id}"))
    }

    pub fn favorites() -> Self {
        Self::parse("/favorites")
    }

    pub fn settings() -> Self {
        Self::parse("/settings")
    }

    /// Unknown paths and malformed recipe ids land on the search page.
    pub fn route(&self) -> Route {
        let segments: Vec<_> = self.path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["recipe", id] => id
                .parse()
                .map_or_else(|_| Route::Search(Criteria::default()), Route::Recipe),
            ["favorites"] => Route::Favorites,
            ["settings"] => Route::Settings,
            _ => Route::Search(parse_criteria(&self.query)),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::parse("/")
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.query.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

/// Back/forward stack of visited locations.
#[derive(Debug)]
pub struct History {
    entries: Vec<Location>,
    cursor: usize,
}

impl History {
    pub fn new(start: Location) -> Self {
        Self {
            entries: vec![start],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.cursor]
    }

    /// Drops forward entries. Returns `false` when `location` is already
    /// current.
    pub fn push(&mut self, location: Location) -> bool {
        if *self.current() == location {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location);
        self.cursor += 1;
        true
    }

    pub fn back(&mut self) -> Option<&Location> {
        self.cursor = self.cursor.checked_sub(1)?;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}
