//! Search state, driven by the location.
//!
//! Criteria are never edited in place: every user action produces new
//! criteria, which become a new location, which is fed back through
//! [`Search::on_location`]. Back and forward therefore replay searches.

use crate::{
    client::{ApiError, SearchRequest},
    model::{Recipe, SearchPage},
};
use tracing::{debug, info};
use url::form_urlencoded;

pub const PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub query: Option<String>,
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    pub offset: usize,
}

/// The filter half of [`Criteria`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

impl Criteria {
    /// Whether there is anything to search for.
    pub fn is_active(&self) -> bool {
        self.query.is_some() || self.diet.is_some() || self.cuisine.is_some() || self.meal_type.is_some()
    }

    pub fn filters(&self) -> Filters {
        Filters {
            diet: self.diet.clone(),
            cuisine: self.cuisine.clone(),
            meal_type: self.meal_type.clone(),
        }
    }

    /// Same search, ignoring the page.
    pub fn same_search(&self, other: &Self) -> bool {
        Self { offset: 0, ..self.clone() } == Self { offset: 0, ..other.clone() }
    }

    /// The search box looks up recipes by ingredients.
    pub fn to_request(&self, number: usize) -> SearchRequest {
        SearchRequest {
            include_ingredients: self.query.clone(),
            diet: self.diet.clone(),
            cuisine: self.cuisine.clone(),
            meal_type: self.meal_type.clone(),
            offset: self.offset,
            number,
        }
    }
}

/// Reads `query`, `diet`, `cuisine`, `type` and `offset`; a leading `?` is
/// allowed. Blank values are absent, a bad offset is 0.
pub fn parse_criteria(query: &str) -> Criteria {
    let query = query.strip_prefix('?').unwrap_or(query);

    form_urlencoded::parse(query.as_bytes()).fold(Criteria::default(), |mut criteria, (key, value)| {
        match key.as_ref() {
            "query" => criteria.query = non_blank(&value),
            "diet" => criteria.diet = non_blank(&value),
            "cuisine" => criteria.cuisine = non_blank(&value),
            "type" => criteria.meal_type = non_blank(&value),
            "offset" => criteria.offset = value.trim().parse().unwrap_or(0),
            _ => {}
        }
        criteria
    })
}

/// Inverse of [`parse_criteria`]; a zero offset is left out.
pub fn criteria_to_query(criteria: &Criteria) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    let pairs = [
        ("query", &criteria.query),
        ("diet", &criteria.diet),
        ("cuisine", &criteria.cuisine),
        ("type", &criteria.meal_type),
    ];
    for (key, value) in pairs {
        if let Some(value) = value {
            query.append_pair(key, value);
        }
    }
    if criteria.offset > 0 {
        query.append_pair("offset", &criteria.offset.to_string());
    }
    query.finish()
}

/// New search text: filters stay, paging restarts.
pub fn handle_search(criteria: &Criteria, query: &str) -> Criteria {
    Criteria {
        query: non_blank(query),
        offset: 0,
        ..criteria.clone()
    }
}

/// New filters: the search text stays, omitted filters are cleared, paging
/// restarts.
pub fn handle_filter_change(criteria: &Criteria, filters: Filters) -> Criteria {
    let Filters {
        diet,
        cuisine,
        meal_type,
    } = filters;
    Criteria {
        query: criteria.query.clone(),
        diet,
        cuisine,
        meal_type,
        offset: 0,
    }
}

pub fn handle_load_more(criteria: &Criteria, page_size: usize) -> Criteria {
    Criteria {
        offset: criteria.offset.saturating_add(page_size),
        ..criteria.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Searching,
    Results,
    NoCredential,
}

/// A search to run. Its response goes back through [`Search::on_response`]
/// with the same `seq`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    pub seq: u64,
    pub request: SearchRequest,
    criteria: Criteria,
    append: bool,
}

#[derive(Debug)]
pub struct Search {
    state: State,
    recipes: Vec<Recipe>,
    total: usize,
    /// Criteria of the last page that made it on screen.
    loaded: Option<Criteria>,
    in_flight: Option<Pending>,
    seq: u64,
    page_size: usize,
}

impl Default for Search {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Search {
    pub fn new(page_size: usize) -> Self {
        Self {
            state: State::Idle,
            recipes: Vec::new(),
            total: 0,
            loaded: None,
            in_flight: None,
            seq: 0,
            page_size,
        }
    }

    pub const fn state(&self) -> State {
        self.state
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub const fn total(&self) -> usize {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.recipes.len() < self.total
    }

    /// Runs on mount, on every location change and whenever the API key
    /// appears or goes away.
    pub fn on_location(&mut self, criteria: &Criteria, has_credential: bool) -> Option<Pending> {
        if !has_credential {
            self.state = State::NoCredential;
            self.in_flight = None;
            return None;
        }

        if !criteria.is_active() {
            self.state = State::Idle;
            self.recipes.clear();
            self.total = 0;
            self.loaded = None;
            self.in_flight = None;
            return None;
        }

        if self.state == State::Results && self.loaded.as_ref() == Some(criteria) {
            debug!("search already on screen");
            return None;
        }

        let append = self
            .loaded
            .as_ref()
            .map_or(false, |loaded| loaded.same_search(criteria) && criteria.offset > loaded.offset);

        self.seq += 1;
        let pending = Pending {
            seq: self.seq,
            request: criteria.to_request(self.page_size),
            criteria: criteria.clone(),
            append,
        };
        debug!(seq = pending.seq, append, "search issued");

        self.state = State::Searching;
        self.in_flight = Some(pending.clone());
        Some(pending)
    }

    /// Applies a response. Responses to anything but the latest request are
    /// dropped. A failure keeps whatever is on screen and hands the error back.
    pub fn on_response(&mut self, seq: u64, result: Result<SearchPage, ApiError>) -> Result<(), ApiError> {
        let pending = match self.in_flight.take() {
            Some(pending) if pending.seq == seq => pending,
            other => {
                self.in_flight = other;
                debug!(seq, latest = self.seq, "stale search response dropped");
                return Ok(());
            }
        };

        match result {
            Ok(page) => {
                if pending.append {
                    self.recipes.extend(page.results);
                } else {
                    self.recipes = page.results;
                }
                self.total = page.total_results;
                self.loaded = Some(pending.criteria);
                self.state = State::Results;
                info!(shown = self.recipes.len(), total = self.total, "search results");
                Ok(())
            }
            Err(error) => {
                self.state = if self.loaded.is_some() {
                    State::Results
                } else {
                    State::Idle
                };
                Err(error)
            }
        }
    }

    /// Criteria for the next page, continuing from what is on screen.
    pub fn load_more(&self, current: &Criteria) -> Criteria {
        let base = self
            .loaded
            .as_ref()
            .filter(|loaded| loaded.same_search(current))
            .unwrap_or(current);
        handle_load_more(base, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::Client, store::ApiKey};
    use json::json;
    use pretty_assertions::assert_eq;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn recipes(ids: std::ops::Range<u64>) -> Vec<Recipe> {
        ids.map(|id| json::from_value(json!({ "id": id, "title": format!("Recipe {id}") })).unwrap())
            .collect()
    }

    fn page(ids: std::ops::Range<u64>, offset: usize, total: usize) -> SearchPage {
        let results = recipes(ids);
        SearchPage {
            number: results.len(),
            results,
            offset,
            total_results: total,
        }
    }

    fn ids(search: &Search) -> Vec<u64> {
        search.recipes().iter().map(|recipe| recipe.id).collect()
    }

    #[test]
    fn parses_location_queries() {
        let criteria = parse_criteria("?query=chicken+breast&diet=vegan&type=main%20course&offset=24&x=1");
        assert_eq!(
            criteria,
            Criteria {
                query: Some("chicken breast".into()),
                diet: Some("vegan".into()),
                cuisine: None,
                meal_type: Some("main course".into()),
                offset: 24,
            }
        );

        assert_eq!(parse_criteria("query=&offset=abc"), Criteria::default());
        assert!(!parse_criteria("").is_active());
    }

    #[test]
    fn writes_canonical_queries() {
        let criteria = Criteria {
            query: Some("tofu".into()),
            diet: Some("vegan".into()),
            ..Criteria::default()
        };
        assert_eq!(criteria_to_query(&criteria), "query=tofu&diet=vegan");

        for query in ["query=tofu&diet=vegan", "cuisine=thai&type=main+course&offset=12", ""] {
            assert_eq!(criteria_to_query(&parse_criteria(query)), query);
        }
    }

    #[test]
    fn request_carries_only_the_searched_fields() {
        let criteria = parse_criteria("query=rice&cuisine=thai&type=soup&offset=24");
        let request = json::to_value(criteria.to_request(12)).unwrap();

        assert_eq!(
            request,
            json!({
                "includeIngredients": "rice",
                "cuisine": "thai",
                "type": "soup",
                "offset": 24,
                "number": 12,
            })
        );
    }

    #[test]
    fn search_keeps_filters_and_resets_offset() {
        let criteria = parse_criteria("query=chicken&diet=vegan&cuisine=thai&offset=36");

        let next = handle_search(&criteria, "tofu");
        assert_eq!(next.query.as_deref(), Some("tofu"));
        assert_eq!(next.filters(), criteria.filters());
        assert_eq!(next.offset, 0);

        assert_eq!(handle_search(&criteria, "  ").query, None);
    }

    #[test]
    fn filter_change_keeps_query_and_clears_omitted() {
        let criteria = parse_criteria("query=rice&diet=vegan&cuisine=thai&offset=12");

        let next = handle_filter_change(
            &criteria,
            Filters {
                cuisine: Some("indian".into()),
                ..Filters::default()
            },
        );
        assert_eq!(criteria_to_query(&next), "query=rice&cuisine=indian");
    }

    #[test]
    fn idle_without_criteria() {
        let mut search = Search::default();
        assert_eq!(search.on_location(&Criteria::default(), true), None);
        assert_eq!(search.state(), State::Idle);
    }

    #[test]
    fn missing_credential_overrides_everything() {
        let mut search = Search::default();
        let criteria = parse_criteria("query=egg");

        assert_eq!(search.on_location(&criteria, false), None);
        assert_eq!(search.state(), State::NoCredential);

        let pending = search.on_location(&criteria, true).unwrap();
        search.on_location(&criteria, false);
        search.on_response(pending.seq, Ok(page(0..3, 0, 3))).unwrap();
        assert_eq!(search.state(), State::NoCredential);
        assert!(search.recipes().is_empty());
    }

    #[test]
    fn load_more_appends_the_next_page() {
        let mut search = Search::default();
        let criteria = parse_criteria("query=chicken");

        let first = search.on_location(&criteria, true).unwrap();
        assert_eq!(search.state(), State::Searching);
        search.on_response(first.seq, Ok(page(0..12, 0, 30))).unwrap();
        assert!(search.has_more());

        let next = search.load_more(&criteria);
        assert_eq!(next.offset, 12);
        assert_eq!(criteria_to_query(&next), "query=chicken&offset=12");

        let second = search.on_location(&next, true).unwrap();
        assert_eq!(second.request.offset, 12);
        search.on_response(second.seq, Ok(page(12..24, 12, 30))).unwrap();

        assert_eq!(search.recipes().len(), 24.min(30));
        assert_eq!(ids(&search), (0..24).collect::<Vec<_>>());
        assert!(search.has_more());

        let third = search.on_location(&search.load_more(&next), true).unwrap();
        search.on_response(third.seq, Ok(page(24..30, 24, 30))).unwrap();
        assert_eq!(search.recipes().len(), 30);
        assert!(!search.has_more());
    }

    #[test]
    fn going_back_to_the_first_page_replaces() {
        let mut search = Search::default();
        let criteria = parse_criteria("query=chicken");
        let pending = search.on_location(&criteria, true).unwrap();
        search.on_response(pending.seq, Ok(page(0..12, 0, 30))).unwrap();
        let pending = search.on_location(&search.load_more(&criteria), true).unwrap();
        search.on_response(pending.seq, Ok(page(12..24, 12, 30))).unwrap();

        let pending = search.on_location(&criteria, true).unwrap();
        search.on_response(pending.seq, Ok(page(0..12, 0, 30))).unwrap();
        assert_eq!(ids(&search), (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn returning_to_the_loaded_location_keeps_every_page() {
        let mut search = Search::default();
        let criteria = parse_criteria("query=chicken");
        let pending = search.on_location(&criteria, true).unwrap();
        search.on_response(pending.seq, Ok(page(0..12, 0, 30))).unwrap();
        let next = search.load_more(&criteria);
        let pending = search.on_location(&next, true).unwrap();
        search.on_response(pending.seq, Ok(page(12..24, 12, 30))).unwrap();

        assert_eq!(search.on_location(&next, true), None);
        assert_eq!(search.state(), State::Results);
        assert_eq!(ids(&search), (0..24).collect::<Vec<_>>());
        assert!(search.has_more());
    }

    #[test]
    fn load_more_never_overflows_the_offset() {
        let criteria = parse_criteria(&format!("query=chicken&offset={}", usize::MAX));
        assert_eq!(criteria.offset, usize::MAX);
        assert_eq!(handle_load_more(&criteria, PAGE_SIZE).offset, usize::MAX);
    }

    #[test]
    fn new_criteria_replace_the_list() {
        let mut search = Search::default();
        let pending = search.on_location(&parse_criteria("query=chicken"), true).unwrap();
        search.on_response(pending.seq, Ok(page(0..12, 0, 30))).unwrap();

        let pending = search
            .on_location(&parse_criteria("query=chicken&diet=vegan"), true)
            .unwrap();
        search.on_response(pending.seq, Ok(page(100..104, 0, 4))).unwrap();

        assert_eq!(ids(&search), [100, 101, 102, 103]);
        assert!(!search.has_more());
    }

    #[test]
    fn failed_load_more_keeps_results_and_offset() {
        let mut search = Search::default();
        let criteria = parse_criteria("query=chicken");
        let pending = search.on_location(&criteria, true).unwrap();
        search.on_response(pending.seq, Ok(page(0..12, 0, 30))).unwrap();

        let next = search.load_more(&criteria);
        let pending = search.on_location(&next, true).unwrap();
        let error = search
            .on_response(pending.seq, Err(ApiError::RateLimited))
            .unwrap_err();

        assert_eq!(error, ApiError::RateLimited);
        assert_eq!(search.state(), State::Results);
        assert_eq!(ids(&search), (0..12).collect::<Vec<_>>());
        // retrying continues from what is on screen, not from the failed offset
        assert_eq!(search.load_more(&next).offset, 12);
    }

    #[test]
    fn first_search_failure_goes_back_to_idle() {
        let mut search = Search::default();
        let pending = search.on_location(&parse_criteria("diet=vegan"), true).unwrap();
        assert!(search
            .on_response(pending.seq, Err(ApiError::QuotaExceeded))
            .is_err());
        assert_eq!(search.state(), State::Idle);
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut search = Search::default();
        let slow = search.on_location(&parse_criteria("query=beef"), true).unwrap();
        let fast = search.on_location(&parse_criteria("query=pork"), true).unwrap();

        search.on_response(fast.seq, Ok(page(0..2, 0, 2))).unwrap();
        search.on_response(slow.seq, Ok(page(50..60, 0, 10))).unwrap();
        search.on_response(slow.seq, Err(ApiError::Status(500))).unwrap();

        assert_eq!(ids(&search), [0, 1]);
        assert_eq!(search.total(), 2);
    }

    #[tokio::test]
    async fn location_drives_the_search_calls() {
        let server = MockServer::start().await;
        let body = |title: &str| {
            json!({
                "results": [{ "id": 1, "title": title }],
                "offset": 0,
                "number": 12,
                "totalResults": 1
            })
        };
        Mock::given(method("GET"))
            .and(path("/recipes/complexSearch"))
            .and(query_param("includeIngredients", "chicken"))
            .and(query_param("diet", "vegan"))
            .and(query_param("offset", "0"))
            .and(query_param("number", "12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body("Vegan chicken")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/recipes/complexSearch"))
            .and(query_param("includeIngredients", "tofu"))
            .and(query_param("diet", "vegan"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body("Tofu stir fry")))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new(&server.uri(), reqwest::Client::new());
        let key = ApiKey::new("k");
        let mut search = Search::default();

        let criteria = parse_criteria("?query=chicken&diet=vegan&offset=0");
        let pending = search.on_location(&criteria, key.is_some()).unwrap();
        let result = client.search_recipes(key.as_ref(), &pending.request).await;
        search.on_response(pending.seq, result).unwrap();
        assert_eq!(search.recipes()[0].title, "Vegan chicken");

        let next = handle_search(&criteria, "tofu");
        assert_eq!(criteria_to_query(&next), "query=tofu&diet=vegan");

        let pending = search
            .on_location(&parse_criteria(&criteria_to_query(&next)), key.is_some())
            .unwrap();
        let result = client.search_recipes(key.as_ref(), &pending.request).await;
        search.on_response(pending.seq, result).unwrap();
        assert_eq!(search.recipes()[0].title, "Tofu stir fry");
    }
}
