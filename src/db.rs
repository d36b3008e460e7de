//! Key-value document store standing in for browser local storage.
//!
//! Every document is a whole JSON value replaced on write; there are no
//! partial updates, transactions or schema versions. Readers tolerate missing
//! fields through `#[serde(default)]` on the models.

use std::{
    collections::HashMap,
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{config::AppConfig, error::AppResult};

/// Document keys, shared with any other client of the same store.
pub mod keys {
    pub const USERS: &str = "ecommerce_users";
    pub const CURRENT_USER: &str = "ecommerce_current_user";
    pub const ORDERS: &str = "ecommerce_orders";
    pub const REVIEWS: &str = "ecommerce_reviews";
    pub const CART: &str = "ecommerce_cart";
    pub const WISHLIST: &str = "ecommerce_wishlist";

    /// Keys that hold lists and are initialised to `[]` on first access.
    pub const TABLES: [&str; 3] = [USERS, ORDERS, REVIEWS];
}

/// Raw string storage, the same contract as `window.localStorage`.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> io::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove_item(&self, key: &str) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per document inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        // Write-then-rename keeps each key atomic.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(tmp, self.path_for(key))
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Typed JSON access over a [`Storage`] backend.
#[derive(Clone)]
pub struct Db {
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

impl Db {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Reads a document. Absent keys, I/O failures and malformed JSON all yield `None`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_read(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read document");
                None
            }
        }
    }

    pub fn try_read<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let Some(raw) = self.storage.get_item(key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.set_item(key, &raw)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> AppResult<()> {
        self.storage.remove_item(key)?;
        Ok(())
    }

    /// Lenient list read for queries: any failure reads as an empty table.
    pub fn read_table<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read(key).unwrap_or_default()
    }

    /// Strict list read for read-modify-write cycles, so a failed read never
    /// gets written back as an empty table.
    pub fn load_table<T: DeserializeOwned>(&self, key: &str) -> AppResult<Vec<T>> {
        Ok(self.try_read(key)?.unwrap_or_default())
    }

    /// Initialises a list document to `[]` if it does not exist yet.
    pub fn ensure_table(&self, key: &str) {
        let result = match self.storage.get_item(key) {
            Ok(Some(_)) => Ok(()),
            Ok(None) => self.storage.set_item(key, "[]"),
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            tracing::warn!(key, error = %err, "failed to initialise table");
        }
    }
}

/// Opens the store described by the config: a directory if one is set, memory otherwise.
pub fn create_store(config: &AppConfig) -> AppResult<Db> {
    let db = match &config.data_dir {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "opening file storage");
            Db::new(Arc::new(FileStorage::open(dir)?))
        }
        None => Db::in_memory(),
    };
    Ok(db)
}
