//! Configuration file handling.
//!
//! The configuration file is stored at `$CARS_HOME/config.json` and says where the sales data
//! lives, where the report is written, who the summary email goes to, and how prices are
//! formatted.

use crate::model::CurrencyFormat;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const APP_NAME: &str = "cars";
const CONFIG_VERSION: u8 = 1;
const OUTBOX: &str = ".outbox";
const CONFIG_JSON: &str = "config.json";
const DATA_JSON: &str = "car_sales.json";
const REPORT_HTML: &str = "cars.html";
const REPORT_TITLE: &str = "Sales summary for last month";
const SENDER: &str = "automation@example.com";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$CARS_HOME` and from there it loads `$CARS_HOME/config.json`. Relative paths in
/// the file are resolved against `$CARS_HOME`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    outbox: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its outbox subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/cars`
    /// - `data_path` - The sales data file. When given it must exist and is stored as an absolute
    ///   path; otherwise `car_sales.json` inside the home directory is assumed.
    /// - `recipient` - Who receives the summary email. Defaults to `$USER@example.com`.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or if a config file already exists.
    pub async fn create(
        dir: impl Into<PathBuf>,
        data_path: Option<&Path>,
        recipient: Option<&str>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the cars home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("A config file already exists at '{}'", config_path.display())
        }

        let outbox = root.join(OUTBOX);
        utils::make_dir(&outbox).await?;

        let data_path = match data_path {
            Some(p) => utils::canonicalize(p)
                .await
                .context("The sales data file must exist")?,
            None => PathBuf::from(DATA_JSON),
        };

        let config_file = ConfigFile {
            data_path,
            recipient: recipient.map(str::to_string).unwrap_or_else(default_recipient),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            outbox,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `cars_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the outbox directory exists
    /// - return the loaded configuration object
    pub async fn load(cars_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = cars_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The cars home directory is missing, run 'cars init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            outbox: root.join(OUTBOX),
            root,
            config_path,
            config_file,
        };
        if !config.outbox.is_dir() {
            bail!(
                "The outbox directory is missing '{}'",
                config.outbox.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn outbox(&self) -> &Path {
        &self.outbox
    }

    /// The sales data file, resolved against the home directory.
    pub fn data_path(&self) -> PathBuf {
        self.resolve(&self.config_file.data_path)
    }

    /// Where the rendered report is written, resolved against the home directory.
    pub fn report_path(&self) -> PathBuf {
        self.resolve(&self.config_file.report_path)
    }

    pub fn report_title(&self) -> &str {
        &self.config_file.report_title
    }

    pub fn sender(&self) -> &str {
        &self.config_file.sender
    }

    pub fn recipient(&self) -> &str {
        &self.config_file.recipient
    }

    pub fn subject(&self) -> &str {
        &self.config_file.subject
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.config_file.currency
    }

    /// Checks if `p` is relative, and if so, resolves it. Returns it unchanged if it is absolute.
    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            return p.to_path_buf();
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "cars",
///   "config_version": 1,
///   "data_path": "car_sales.json",
///   "report_path": "cars.html",
///   "report_title": "Sales summary for last month",
///   "sender": "automation@example.com",
///   "recipient": "alice@example.com",
///   "subject": "Sales summary for last month",
///   "currency": { "symbol": "$", "decimal_separator": ".", "grouping_separator": null }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "cars"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the sales data (relative to the home directory or absolute)
    #[serde(default = "default_data_path")]
    data_path: PathBuf,

    /// Path of the rendered report (relative to the home directory or absolute)
    #[serde(default = "default_report_path")]
    report_path: PathBuf,

    #[serde(default = "default_title")]
    report_title: String,

    #[serde(default = "default_sender")]
    sender: String,

    #[serde(default = "default_recipient")]
    recipient: String,

    #[serde(default = "default_title")]
    subject: String,

    /// How prices are written in the sales data
    #[serde(default)]
    currency: CurrencyFormat,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            data_path: default_data_path(),
            report_path: default_report_path(),
            report_title: default_title(),
            sender: default_sender(),
            recipient: default_recipient(),
            subject: default_title(),
            currency: CurrencyFormat::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if `app_name` is wrong
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DATA_JSON)
}

fn default_report_path() -> PathBuf {
    PathBuf::from(REPORT_HTML)
}

fn default_title() -> String {
    REPORT_TITLE.to_string()
}

fn default_sender() -> String {
    SENDER.to_string()
}

fn default_recipient() -> String {
    let user = match std::env::var("USER") {
        Ok(user) if !user.is_empty() => user,
        _ => {
            warn!("USER is not set, the default recipient will be user@example.com");
            String::from("user")
        }
    };
    format!("{user}@example.com")
}
