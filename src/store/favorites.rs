use super::StoreError;
use crate::{model::Recipe, notice::Notice, storage::Storage};
use tracing::{debug, info};

pub const STORAGE_KEY: &str = "recipe-favorites";

/// Saved recipe snapshots, unique by id, in the order they were added.
///
/// Every change serializes and rewrites the whole list; memory is only
/// updated once that write went through.
#[derive(Debug)]
pub struct Favorites<S> {
    storage: S,
    recipes: Vec<Recipe>,
}

impl<S: Storage> Favorites<S> {
    /// Loads the stored list. Unreadable data is reported and the collection
    /// starts out empty.
    pub fn open(storage: S) -> (Self, Option<StoreError>) {
        let loaded = storage
            .get(STORAGE_KEY)
            .and_then(|stored| match stored {
                Some(stored) => json::from_str(&stored).map_err(Into::into),
                None => Ok(Vec::new()),
            })
            .map_err(|error| StoreError::load("Failed to load favorites", error));

        let (recipes, error) = match loaded {
            Ok(recipes) => (dedup(recipes), None),
            Err(error) => (Vec::new(), Some(error)),
        };
        debug!(count = recipes.len(), "favorites loaded");

        (Self { storage, recipes }, error)
    }

    pub fn list(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn contains(&self, id: u64) -> bool {
        self.recipes.iter().any(|recipe| recipe.id == id)
    }

    pub fn add(&mut self, recipe: Recipe) -> Result<Notice, StoreError> {
        if self.contains(recipe.id) {
            return Ok(Notice::info("Recipe already in favorites"));
        }

        let mut recipes = self.recipes.clone();
        info!(id = recipe.id, title = %recipe.title, "adding favorite");
        recipes.push(recipe);
        self.commit(recipes)?;

        Ok(Notice::success("Recipe added to favorites"))
    }

    /// `None` when `id` wasn't a favorite; nothing is written then.
    pub fn remove(&mut self, id: u64) -> Result<Option<Notice>, StoreError> {
        if !self.contains(id) {
            return Ok(None);
        }

        let recipes = self
            .recipes
            .iter()
            .filter(|recipe| recipe.id != id)
            .cloned()
            .collect();
        info!(id, "removing favorite");
        self.commit(recipes)?;

        Ok(Some(Notice::success("Recipe removed from favorites")))
    }

    pub fn toggle(&mut self, recipe: Recipe) -> Result<Option<Notice>, StoreError> {
        if self.contains(recipe.id) {
            self.remove(recipe.id)
        } else {
            self.add(recipe).map(Some)
        }
    }

    fn commit(&mut self, recipes: Vec<Recipe>) -> Result<(), StoreError> {
        let serialized = json::to_string(&recipes)
            .map_err(|error| StoreError::write("Failed to save favorites", error))?;
        self.storage
            .set(STORAGE_KEY, &serialized)
            .map_err(|error| StoreError::write("Failed to save favorites", error))?;

        self.recipes = recipes;
        Ok(())
    }
}

/// Keeps the first occurrence of each id, for lists written by hand or by
/// older versions.
fn dedup(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut seen = std::collections::HashSet::new();
    recipes
        .into_iter()
        .filter(|recipe| seen.insert(recipe.id))
        .collect()
}
