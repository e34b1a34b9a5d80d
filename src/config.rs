use crate::{anyio, client::Client, search::PAGE_SIZE, utils::Result};
use std::path::PathBuf;

const APP_DIR: &str = "recipe-explorer";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base of the recipe API.
    pub api: String,
    /// Where the API key and favorites are kept.
    pub data_dir: PathBuf,
    pub page_size: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyio!("no data directory for this user"))?;

        Ok(Self {
            api: Client::DEFAULT_API.to_owned(),
            data_dir: base.join(APP_DIR),
            page_size: PAGE_SIZE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_spoonacular() {
        // no home directory, nothing to check
        if let Ok(config) = Config::load() {
            assert_eq!(config.api, "https://api.spoonacular.com");
            assert_eq!(config.page_size, 12);
            assert!(config.data_dir.ends_with(APP_DIR));
        }
    }
}
