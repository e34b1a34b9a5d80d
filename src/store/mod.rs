//! The two pieces of state kept on disk: the API key and the favorites.

pub mod credentials;
pub mod favorites;

pub use credentials::{ApiKey, Credentials};
pub use favorites::Favorites;

use crate::{notice::Notice, utils::Error};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Please enter a valid API key")]
    EmptyKey,

    /// Storage refused the write; `action` is what the user sees.
    #[error("{action}")]
    Write { action: &'static str, cause: Error },

    #[error("{action}")]
    Load { action: &'static str, cause: Error },
}

impl StoreError {
    pub(crate) fn write(action: &'static str, cause: impl Into<Error>) -> Self {
        let cause = cause.into();
        tracing::error!(%cause, "{action}");
        Self::Write { action, cause }
    }

    pub(crate) fn load(action: &'static str, cause: impl Into<Error>) -> Self {
        let cause = cause.into();
        tracing::error!(%cause, "{action}");
        Self::Load { action, cause }
    }
}

/// Load failures are warnings, everything else is an error.
impl From<&StoreError> for Notice {
    fn from(error: &StoreError) -> Self {
        match error {
            StoreError::Load { .. } => Self::warn(error),
            StoreError::EmptyKey | StoreError::Write { .. } => Self::error(error),
        }
    }
}
