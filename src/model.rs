use serde::{Deserialize, Serialize};

/// A recipe snapshot as the API returned it.
///
/// Fields the client doesn't model are kept in `extra`, so a stored favorite
/// round-trips to the exact object that was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoonacular_score: Option<f64>,
    /// In cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_serving: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisines: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dish_types: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(flatten)]
    pub extra: json::Map<String, json::Value>,
}

impl Recipe {
    /// `spoonacularScore` is 0..100, shown as x/10.
    pub fn rating(&self) -> Option<f64> {
        self.spoonacular_score.map(|score| score.round() / 10.0)
    }

    pub fn price_label(&self) -> Option<String> {
        self.price_per_serving
            .map(|cents| format!("${:.2} per serving", cents / 100.0))
    }

    pub fn health_band(&self) -> Option<HealthBand> {
        self.health_score.map(|score| {
            if score >= 70.0 {
                HealthBand::Good
            } else if score >= 40.0 {
                HealthBand::Fair
            } else {
                HealthBand::Poor
            }
        })
    }

    /// Diets, cuisines and dish types, in that order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        [&self.diets, &self.cuisines, &self.dish_types]
            .into_iter()
            .flatten()
            .flatten()
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    Good,
    Fair,
    Poor,
}

/// Body of `GET /recipes/complexSearch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub results: Vec<Recipe>,
    pub offset: usize,
    pub number: usize,
    pub total_results: usize,
}

/// A filter value the API understands, with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub id: &'static str,
    pub label: &'static str,
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label)
    }
}

macro_rules! choices {
    ($($id:literal => $label:literal),* $(,)?) => {
        &[$(Choice { id: $id, label: $label }),*]
    };
}

pub const DIETS: &[Choice] = choices![
    "glutenFree" => "Gluten Free",
    "ketogenic" => "Ketogenic",
    "vegetarian" => "Vegetarian",
    "lactoVegetarian" => "Lacto-Vegetarian",
    "ovoVegetarian" => "Ovo-Vegetarian",
    "vegan" => "Vegan",
    "pescetarian" => "Pescetarian",
    "paleo" => "Paleo",
    "primal" => "Primal",
    "lowFODMAP" => "Low FODMAP",
    "whole30" => "Whole30",
];

pub const CUISINES: &[Choice] = choices![
    "african" => "African",
    "american" => "American",
    "british" => "British",
    "cajun" => "Cajun",
    "caribbean" => "Caribbean",
    "chinese" => "Chinese",
    "eastern-european" => "Eastern European",
    "european" => "European",
    "french" => "French",
    "german" => "German",
    "greek" => "Greek",
    "indian" => "Indian",
    "irish" => "Irish",
    "italian" => "Italian",
    "japanese" => "Japanese",
    "jewish" => "Jewish",
    "korean" => "Korean",
    "latin-american" => "Latin American",
    "mediterranean" => "Mediterranean",
    "mexican" => "Mexican",
    "middle-eastern" => "Middle Eastern",
    "nordic" => "Nordic",
    "southern" => "Southern",
    "spanish" => "Spanish",
    "thai" => "Thai",
    "vietnamese" => "Vietnamese",
];

pub const MEAL_TYPES: &[Choice] = choices![
    "main course" => "Main Course",
    "side dish" => "Side Dish",
    "dessert" => "Dessert",
    "appetizer" => "Appetizer",
    "salad" => "Salad",
    "bread" => "Bread",
    "breakfast" => "Breakfast",
    "soup" => "Soup",
    "beverage" => "Beverage",
    "sauce" => "Sauce",
    "marinade" => "Marinade",
    "fingerfood" => "Fingerfood",
    "snack" => "Snack",
    "drink" => "Drink",
];

/// Looks up the choice for an id coming from a location.
pub fn choice(options: &'static [Choice], id: &str) -> Option<Choice> {
    options.iter().copied().find(|choice| choice.id == id)
}
