//! # Configuration State
//!
//! Application configuration loaded once per command.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--output-dir`, applied by the command layer)
//! 2. Environment variables (`INVOICER_*`)
//! 3. Config file (`config.toml`)
//! 4. Defaults (this file)
//!
//! ## Config File Location
//! ```text
//! --config PATH          explicit, must exist
//!   │ else
//! INVOICER_CONFIG        explicit, must exist
//!   │ else
//! <platform config dir>/config.toml   optional, defaults if absent
//!   e.g. ~/.config/invoicer/config.toml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use invoicer_core::validation::{validate_tax_percent, MAX_REPRESENTABLE_TAX_PERCENT};
use invoicer_core::{CurrencyFormat, TaxRate, DEFAULT_CURRENCY_SYMBOL, DEFAULT_TAX_PERCENT};
use invoicer_document::LayoutOptions;
use invoicer_store::StoreConfig;

/// Seller block used until one is configured.
pub const DEFAULT_SELLER_INFO: &str = "Your Business Name\n123 Business St\nCity, State, ZIP\nPhone: (555) 123-4567\nEmail: info@yourbusiness.com";

/// Line printed under the totals block.
pub const DEFAULT_CLOSING_LINE: &str = "Thank you for your business!";

/// Draft file used when `--draft` is not given.
pub const DEFAULT_DRAFT_FILE: &str = "invoice-draft.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Application configuration.
///
/// Every field is optional in the file; missing keys fall back to
/// [`ConfigState::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Seller block printed on every invoice
    pub seller_info: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Default tax rate as a percentage, e.g. 18.0
    pub tax_rate: f64,

    /// Where documents and the record log are written
    pub output_dir: PathBuf,

    /// Line printed under the totals block
    pub closing_line: String,

    /// Printer used when `print` is given no `--printer`
    pub printer: Option<String>,

    /// Draft file used when `--draft` is not given
    pub draft_path: PathBuf,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Seller: placeholder business block
    /// - Currency: ₹
    /// - Tax: 18%
    /// - Output: `./invoices`
    /// - Printer: none (system default)
    fn default() -> Self {
        ConfigState {
            seller_info: DEFAULT_SELLER_INFO.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            tax_rate: DEFAULT_TAX_PERCENT,
            output_dir: PathBuf::from("invoices"),
            closing_line: DEFAULT_CLOSING_LINE.to_string(),
            printer: None,
            draft_path: PathBuf::from(DEFAULT_DRAFT_FILE),
        }
    }
}

impl ConfigState {
    /// Loads configuration from the file and the process environment.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit_path, |key| std::env::var(key).ok())
    }

    /// Loads configuration with an injectable environment lookup.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let config = ConfigState::load_with(None, |key| match key {
    ///     "INVOICER_TAX_RATE" => Some("5".to_string()),
    ///     _ => None,
    /// })?;
    /// ```
    pub fn load_with<F>(explicit_path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| env("INVOICER_CONFIG").map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => ConfigState::default(),
            },
        };

        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Applies `INVOICER_*` overrides.
    ///
    /// ## Environment Variables
    /// - `INVOICER_OUTPUT_DIR`: Override output directory
    /// - `INVOICER_TAX_RATE`: Override default tax rate (e.g., "18")
    /// - `INVOICER_CURRENCY_SYMBOL`: Override currency symbol
    /// - `INVOICER_SELLER_INFO`: Override seller block
    /// - `INVOICER_PRINTER`: Override printer
    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = env("INVOICER_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        if let Some(text) = env("INVOICER_TAX_RATE") {
            let rate = validate_tax_percent(&text)
                .map_err(|e| ConfigError::invalid("INVOICER_TAX_RATE", e.to_string()))?;
            self.tax_rate = rate.percentage();
        }

        if let Some(symbol) = env("INVOICER_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(seller) = env("INVOICER_SELLER_INFO") {
            self.seller_info = seller.replace("\\n", "\n");
        }

        if let Some(printer) = env("INVOICER_PRINTER") {
            self.printer = Some(printer).filter(|p| !p.trim().is_empty());
        }

        Ok(())
    }

    /// Checks values that would otherwise fail later in a command.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let representable = MAX_REPRESENTABLE_TAX_PERCENT as f64;
        if !self.tax_rate.is_finite() || self.tax_rate < 0.0 || self.tax_rate > representable {
            return Err(ConfigError::invalid(
                "tax_rate",
                "must be a number not less than 0",
            ));
        }

        self.currency()?;

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid("output_dir", "must not be empty"));
        }
        Ok(())
    }

    pub fn currency(&self) -> Result<CurrencyFormat, ConfigError> {
        CurrencyFormat::new(self.currency_symbol.clone())
            .map_err(|e| ConfigError::invalid("currency_symbol", e.to_string()))
    }

    pub fn default_tax_rate(&self) -> TaxRate {
        TaxRate::from_percentage(self.tax_rate)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.output_dir.clone())
    }

    pub fn layout_options(&self) -> Result<LayoutOptions, ConfigError> {
        Ok(LayoutOptions {
            currency: self.currency()?,
            closing_line: self.closing_line.clone(),
            ..LayoutOptions::default()
        })
    }
}

/// `<platform config dir>/config.toml`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "invoicer", "invoicer").map(|dirs| dirs.config_dir().join("config.toml"))
}
