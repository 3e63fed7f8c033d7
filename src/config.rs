//! Configuration file handling for famfin.
//!
//! The configuration file is stored at `$FAMFIN_HOME/config.json`. It names the default user whose
//! finances the commands operate on and, optionally, an alternative location for the SQLite file.

use crate::db::Db;
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "famfin";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const FAMFIN_SQLITE: &str = "famfin.sqlite";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FAMFIN_HOME` and from there it loads `$FAMFIN_HOME/config.json` and opens the
/// database.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the data directory, writes an initial `config.json` and initializes the database.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/famfin`
    /// - `default_user` - The user id to use when none is given on the command line.
    ///
    /// # Errors
    /// - Returns an error if a config file or database already exists in `dir`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, default_user: Option<String>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the famfin home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            );
        }

        let config_file = ConfigFile {
            default_user: default_user
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            ..ConfigFile::default()
        };

        let sqlite_path = root.join(FAMFIN_SQLITE);
        let db = Db::init(&sqlite_path)
            .await
            .context("Unable to create SQLite DB")?;
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    /// This will
    /// - validate that `famfin_home` exists and that the config file exists
    /// - load the config file
    /// - open the database, migrating it if its schema is out of date
    pub async fn load(famfin_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = famfin_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The famfin home directory is missing")?;
        let _ = utils::read_dir(&root).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let sqlite_path = match &config_file.sqlite_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => root.join(p),
            None => root.join(FAMFIN_SQLITE),
        };
        let db = Db::load(&sqlite_path)
            .await
            .context("Unable to load SQLite DB")?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn default_user(&self) -> Option<&str> {
        self.config_file.default_user.as_deref()
    }

    /// Picks the user id to operate on: `requested` if given, otherwise the configured default.
    ///
    /// # Errors
    /// Returns an error if neither is set, or if `requested` is blank.
    pub fn user(&self, requested: Option<&str>) -> Result<String> {
        let user = match requested {
            Some(user) => user.trim(),
            None => self.default_user().with_context(|| {
                format!(
                    "No user given and no default_user in '{}'",
                    self.config_path.display()
                )
            })?,
        };
        ensure!(!user.is_empty(), "The user id cannot be blank");
        Ok(user.to_string())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "famfin",
///   "config_version": 1,
///   "default_user": "5f1c2b",
///   "sqlite_path": "data/famfin.sqlite"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "famfin"
    app_name: String,

    config_version: u8,

    /// User id used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_user: Option<String>,

    /// Path to the SQLite file, relative to the home directory or absolute. Defaults to
    /// `$FAMFIN_HOME/famfin.sqlite`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sqlite_path: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            default_user: None,
            sqlite_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;
        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.config_version <= CONFIG_VERSION,
            "Unsupported config_version {} in {}",
            config.config_version,
            path.display()
        );
        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}
