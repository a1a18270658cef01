//! Configuration file management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sidekick_compose::{ComposeOptions, DEFAULT_ATLAS_SIZE};
use sidekick_db::OpenOptions;

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Default catalog file name inside the data directory.
pub const CATALOG_FILE: &str = "sidekick.db";

/// Complete tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    /// Catalog database file. Empty = `$data_dir/sidekick.db`.
    #[serde(default)]
    pub path: String,
    /// Purge orphaned rows whenever the catalog is opened.
    #[serde(default = "default_true")]
    pub sweep_on_open: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory part locations are relative to. Empty = current directory.
    #[serde(default)]
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Edge length of each color atlas texture.
    #[serde(default = "default_atlas_size")]
    pub atlas_size: u32,
    /// Write re-checked file presence back to the catalog while composing.
    #[serde(default)]
    pub persist_file_checks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_true() -> bool {
    true
}

fn default_atlas_size() -> u32 {
    DEFAULT_ATLAS_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            path: String::new(),
            sweep_on_open: true,
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            atlas_size: default_atlas_size(),
            persist_file_checks: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from `path`, or from the data directory when
    /// `path` is `None`.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = path.map_or_else(Self::config_path, Path::to_path_buf);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        if self.catalog.path.is_empty() {
            Self::data_dir().join(CATALOG_FILE)
        } else {
            PathBuf::from(&self.catalog.path)
        }
    }

    pub fn asset_root(&self) -> PathBuf {
        if self.assets.root.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(&self.assets.root)
        }
    }

    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            sweep_on_open: self.catalog.sweep_on_open,
        }
    }

    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            asset_root: self.asset_root(),
            atlas_size: self.compose.atlas_size,
            persist_file_checks: self.compose.persist_file_checks,
        }
    }

    fn config_path() -> PathBuf {
        Self::data_dir().join(CONFIG_FILE)
    }

    /// `SIDEKICK_DATA_DIR`, else a platform default.
    pub fn data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("SIDEKICK_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            home_fallback("Library/Application Support/Sidekick")
        }
        #[cfg(target_os = "windows")]
        {
            home_fallback("Sidekick")
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            home_fallback(".sidekick")
        }
    }
}

fn home_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| std::env::temp_dir().join("sidekick"))
}
