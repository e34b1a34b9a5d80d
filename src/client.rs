use crate::{
    model::{Recipe, SearchPage},
    store::ApiKey,
    utils::Result,
};
use bytes::Bytes;
use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fmt::{Debug, Formatter},
    ops::Deref,
};
use thiserror::Error;
use tracing::{debug, warn};

macro_rules! api {
    ($api:expr, $($tt:tt)*) => {
        format!("{}/{}", $api, format!($($tt)*))
    };
}

/// Why a call to the recipe API produced nothing. The message is what the
/// user gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("API key is required. Please add your API key in settings.")]
    MissingCredential,
    #[error("Invalid API key. Please check your API key in settings.")]
    InvalidCredential,
    #[error("API quota exceeded. Please try again tomorrow or upgrade your plan.")]
    QuotaExceeded,
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    #[error("Recipe not found.")]
    NotFound,
    #[error("API error: {0}")]
    Status(u16),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unexpected response from the API: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Search,
    Information,
}

impl ApiError {
    fn from_status(status: StatusCode, endpoint: Endpoint) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::InvalidCredential,
            StatusCode::PAYMENT_REQUIRED => Self::QuotaExceeded,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            StatusCode::NOT_FOUND if endpoint == Endpoint::Information => Self::NotFound,
            status => Self::Status(status.as_u16()),
        }
    }
}

/// Query of `GET /recipes/complexSearch`, minus the key and the fixed flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_ingredients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    pub offset: usize,
    pub number: usize,
}

pub struct Client {
    api: String,
    inner: reqwest::Client,
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Client {{ api: {}, client: reqwest::Client }}", self.api)
    }
}

impl Deref for Client {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Client {
    pub(crate) const DEFAULT_API: &'static str = "https://api.spoonacular.com";

    pub fn new(api: &str, inner: reqwest::Client) -> Self {
        Self {
            api: api.trim_end_matches('/').to_owned(),
            inner,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        request: RequestBuilder,
        endpoint: Endpoint,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error = ApiError::from_status(status, endpoint);
            warn!(%status, ?endpoint, %error, "request rejected");
            return Err(error);
        }

        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Recipe information is requested inline, so results already carry
    /// everything the detail page shows.
    pub async fn search_recipes(
        &self,
        key: Option<&ApiKey>,
        request: &SearchRequest,
    ) -> Result<SearchPage, ApiError> {
        let key = key.ok_or(ApiError::MissingCredential)?;
        debug!(?request, "searching recipes");

        let page: SearchPage = Self::fetch(
            self.get(api!(self.api, "recipes/complexSearch"))
                .query(&[
                    ("apiKey", key.expose()),
                    ("addRecipeInformation", "true"),
                    ("fillIngredients", "false"),
                ])
                .query(request),
            Endpoint::Search,
        )
        .await?;

        debug!(
            offset = page.offset,
            count = page.results.len(),
            total = page.total_results,
            "search page received"
        );
        Ok(page)
    }

    pub async fn recipe(&self, key: Option<&ApiKey>, id: u64) -> Result<Recipe, ApiError> {
        let key = key.ok_or(ApiError::MissingCredential)?;
        debug!(id, "fetching recipe");

        Self::fetch(
            self.get(api!(self.api, "recipes/{id}/information"))
                .query(&[("apiKey", key.expose())]),
            Endpoint::Information,
        )
        .await
    }

    pub async fn image_bytes(&self, url: &str) -> Result<Bytes> {
        Ok(self
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?)
    }
}
