//! String keyed persistent storage, the desktop stand-in for a browser's
//! `localStorage`.

use crate::utils::{Context, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, trace};

pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the whole value. A failed write leaves the old value in place.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per key under `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context(format!("cannot create {}", dir.display()))?;
        debug!(dir = %dir.display(), "storage opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        // keys are ours, but keep them from walking out of `dir`
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).context(format!("cannot read `{key}`")),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).context(format!("cannot write `{key}`"))?;
        fs::rename(&tmp, &path).context(format!("cannot replace `{key}`"))?;
        trace!(key, bytes = value.len(), "stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => {
                Err(err).context(format!("cannot remove `{key}`"))
            }
            _ => Ok(()),
        }
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
pub mod memory {
    use super::Storage;
    use crate::utils::Result;
    use std::{cell::RefCell, collections::HashMap};

    /// In-memory storage, optionally refusing writes.
    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        values: RefCell<HashMap<String, String>>,
        read_only: bool,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every write fails, like a browser storage over its quota.
        pub fn read_only(values: impl IntoIterator<Item = (String, String)>) -> Self {
            Self {
                values: RefCell::new(values.into_iter().collect()),
                read_only: true,
            }
        }

        fn check_writable(&self) -> Result<()> {
            if self.read_only {
                Err(crate::anyio!("storage is read only"))
            } else {
                Ok(())
            }
        }
    }

    impl Storage for MemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.check_writable()?;
            self.values
                .borrow_mut()
                .insert(key.to_owned(), value.to_owned());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.check_writable()?;
            self.values.borrow_mut().remove(key);
            Ok(())
        }
    }
}
