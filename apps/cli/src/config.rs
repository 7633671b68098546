//! # CLI Configuration
//!
//! Settings for one installation: where the data lives, when stock counts
//! as low, how ledger deletes behave, and the login pair.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --data-dir ./shop-data                                             │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     STOCKBOOK_DATA_DIR=/srv/stockbook                                  │
//! │     STOCKBOOK_LOW_STOCK_THRESHOLD=3                                    │
//! │     STOCKBOOK_AUTH_USERNAME / STOCKBOOK_AUTH_PASSWORD                  │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/stockbook/config.toml (Linux)                            │
//! │     ~/Library/Application Support/com.stockbook.stockbook/ (macOS)     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! data_dir = "/srv/stockbook"
//!
//! [inventory]
//! low_stock_threshold = 5
//!
//! [ledger]
//! reverse_balance_on_delete = true
//!
//! [auth]
//! username = "admin"
//! password = "admin123"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stockbook_core::LOW_STOCK_THRESHOLD;
use stockbook_store::StoreOptions;
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding the snapshot files.
    /// Default: the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Products with `0 < quantity <= threshold` are reported as low stock.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_low_stock_threshold() -> i64 {
    LOW_STOCK_THRESHOLD
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Undo a ledger entry's balance effect when it is deleted or edited.
    /// `false` only removes the entry from the ledger.
    #[serde(default = "default_true")]
    pub reverse_balance_on_delete: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            reverse_balance_on_delete: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin123".to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            username: default_username(),
            password: default_password(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete configuration for the `stockbook` binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub ledger: LedgerSettings,

    #[serde(default)]
    pub auth: AuthSettings,
}

impl AppConfig {
    /// Loads configuration from defaults, file, environment and flags.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`--config`, else the platform config path)
    /// 3. Environment variables
    /// 4. `--data-dir`
    pub fn load(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> CliResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents =
                    std::fs::read_to_string(&path).map_err(|e| CliError::config_io(&path, e))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();

        if let Some(dir) = data_dir {
            debug!(?dir, "Overriding data directory from command line");
            config.storage.data_dir = Some(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CliError::config("No config path available"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CliError::config_io(parent, e))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| CliError::config_io(&path, e))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.inventory.low_stock_threshold < 0 {
            return Err(CliError::config(
                "inventory.low_stock_threshold must not be negative",
            ));
        }

        if self.auth.username.trim().is_empty() {
            return Err(CliError::config("auth.username must not be empty"));
        }
        if self.auth.password.is_empty() {
            return Err(CliError::config("auth.password must not be empty"));
        }

        if let Some(dir) = &self.storage.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(CliError::config("storage.data_dir must not be empty"));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies `STOCKBOOK_*` overrides read through `lookup`.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("STOCKBOOK_DATA_DIR") {
            debug!(dir = %dir, "Overriding data directory from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(threshold) = lookup("STOCKBOOK_LOW_STOCK_THRESHOLD") {
            match threshold.trim().parse::<i64>() {
                Ok(t) => self.inventory.low_stock_threshold = t,
                Err(_) => warn!(value = %threshold, "Ignoring non-numeric STOCKBOOK_LOW_STOCK_THRESHOLD"),
            }
        }

        if let Some(username) = lookup("STOCKBOOK_AUTH_USERNAME") {
            self.auth.username = username;
        }

        if let Some(password) = lookup("STOCKBOOK_AUTH_PASSWORD") {
            self.auth.password = password;
        }
    }

    /// Platform config path (`.../stockbook/config.toml`).
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockbook", "stockbook")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn default_data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockbook", "stockbook")
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved snapshot directory.
    pub fn data_dir(&self) -> CliResult<PathBuf> {
        self.storage
            .data_dir
            .clone()
            .or_else(Self::default_data_dir)
            .ok_or_else(|| CliError::config("No data directory; set storage.data_dir"))
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions::default()
            .low_stock_threshold(self.inventory.low_stock_threshold)
            .reverse_balance_on_delete(self.ledger.reverse_balance_on_delete)
            .credentials(self.auth.username.clone(), self.auth.password.clone())
    }

    /// Copy safe to print: the password is masked.
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        shown.auth.password = "********".to_string();
        shown
    }
}
