use super::StoreError;
use crate::{notice::Notice, storage::Storage};
use std::fmt::{Debug, Formatter};
use tracing::{info, warn};

pub const STORAGE_KEY: &str = "spoonacular-api-key";

/// A Spoonacular API key. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// `None` for blank input; surrounding whitespace is dropped.
    pub fn new(key: &str) -> Option<Self> {
        let key = key.trim();
        (!key.is_empty()).then(|| Self(key.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() > 8 {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            write!(f, "ApiKey(****{tail})")
        } else {
            write!(f, "ApiKey(****)")
        }
    }
}

/// The stored API key, cached after the first read.
#[derive(Debug)]
pub struct Credentials<S> {
    storage: S,
    key: Option<ApiKey>,
}

impl<S: Storage> Credentials<S> {
    pub fn open(storage: S) -> Self {
        let key = match storage.get(STORAGE_KEY) {
            Ok(stored) => stored.as_deref().and_then(ApiKey::new),
            Err(error) => {
                warn!(%error, "cannot read the stored API key");
                None
            }
        };
        Self { storage, key }
    }

    pub fn get(&self) -> Option<&ApiKey> {
        self.key.as_ref()
    }

    pub fn set(&mut self, value: &str) -> Result<Notice, StoreError> {
        let key = ApiKey::new(value).ok_or(StoreError::EmptyKey)?;
        self.storage
            .set(STORAGE_KEY, key.expose())
            .map_err(|error| StoreError::write("Failed to save API key", error))?;

        info!(?key, "API key saved");
        self.key = Some(key);
        Ok(Notice::success("API key saved successfully"))
    }

    pub fn clear(&mut self) -> Result<Notice, StoreError> {
        self.storage
            .remove(STORAGE_KEY)
            .map_err(|error| StoreError::write("Failed to remove API key", error))?;

        info!("API key removed");
        self.key = None;
        Ok(Notice::success("API key removed"))
    }
}
