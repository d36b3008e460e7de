use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory backing the document store; `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    pub catalog_path: PathBuf,
    pub checkout_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = env::var("STOREFRONT_DATA_DIR")
            .ok()
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        let catalog_path = env::var("STOREFRONT_CATALOG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("catalog.json"));
        let checkout_delay = env::var("STOREFRONT_CHECKOUT_DELAY_MS")
            .ok()
            .and_then(|ms| ms.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(2000));
        Ok(Self {
            data_dir,
            catalog_path,
            checkout_delay,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            catalog_path: PathBuf::from("catalog.json"),
            checkout_delay: Duration::ZERO,
        }
    }
}
