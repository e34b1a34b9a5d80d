use std::{
    error::Error as StdError,
    fmt::{Display, Formatter},
    sync::Arc,
};
use tracing::debug;

/// Cloneable error so it can ride inside iced messages.
#[derive(Debug, Clone)]
pub struct Error {
    inner: Arc<anyhow::Error>,
}

impl<E> From<E> for Error
where
    E: StdError + Send + Sync + 'static,
{
    #[cold]
    fn from(error: E) -> Self {
        debug!("`{error}`");
        Self {
            inner: Arc::new(error.into()),
        }
    }
}

impl Error {
    /// Wraps the error with what was being done when it happened.
    #[must_use]
    pub fn context(self, context: impl Display + Send + Sync + 'static) -> Self {
        let inner = Arc::try_unwrap(self.inner)
            .unwrap_or_else(|shared| anyhow::anyhow!("{shared:#}"));
        Self {
            inner: Arc::new(inner.context(context)),
        }
    }

    /// Walks the source chain, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        self.inner.chain()
    }
}

pub trait Context<T> {
    fn context(self, context: impl Display + Send + Sync + 'static) -> Result<T>;
}

impl<T, E: Into<Error>> Context<T> for std::result::Result<T, E> {
    fn context(self, context: impl Display + Send + Sync + 'static) -> Result<T> {
        self.map_err(|error| error.into().context(context))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

#[macro_export]
macro_rules! anyio {
    ($($tt:tt)*) => {
        $crate::utils::Error::from(std::io::Error::other(format!($($tt)*)))
    };
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_original_message() {
        let error = anyio!("quota of {} reached", 150);
        assert_eq!(error.to_string(), "quota of 150 reached");
        assert_eq!(error.clone().to_string(), error.to_string());
    }

    #[test]
    fn context_goes_on_top() {
        let error = anyio!("disk full").context("cannot write `recipe-favorites`");
        assert_eq!(error.to_string(), "cannot write `recipe-favorites`");

        let messages: Vec<_> = error.chain().map(ToString::to_string).collect();
        assert_eq!(messages, ["cannot write `recipe-favorites`", "disk full"]);

        let shared = anyio!("gone");
        let _keep = shared.clone();
        let wrapped: Result<()> = Err(shared).context("cannot read");
        assert_eq!(wrapped.unwrap_err().chain().count(), 2);
    }

    #[test]
    fn converts_from_std_errors() {
        let error: Error = json::from_str::<u32>("nope").unwrap_err().into();
        assert!(error.chain().count() >= 1);
        assert!(error.to_string().contains("expected"));
    }
}
