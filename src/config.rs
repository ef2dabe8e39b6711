// Credentials persistence. The record lives as a small JSON file in the
// user's home directory (`~/.termup.json`, shared with earlier releases),
// next to the user's other dotfiles.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, UplError};

/// Used when the stored record (or the configuration session) leaves the
/// public URL empty.
pub const DEFAULT_PUBLIC_URL: &str = "https://your-bucket.s3.amazonaws.com/";

const CONFIG_FILE_NAME: &str = ".termup.json";

/// Environment variable that points the store at a different file.
pub const CONFIG_PATH_ENV: &str = "UPL_CONFIG";

/// Access key pair plus the addressing information for one bucket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub endpoint: String,
    #[serde(default)]
    pub public_url: String,
}

/// Fixed-path JSON file holding the credentials record.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store at `$UPL_CONFIG` if set, otherwise `~/.termup.json`.
    pub fn default_location() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(Self::at(path));
        }
        let home = dirs::home_dir().ok_or(UplError::NoHomeDir)?;
        Ok(Self::in_home(&home))
    }

    /// The dotfile inside `home`.
    pub fn in_home(home: &Path) -> Self {
        Self::at(home.join(CONFIG_FILE_NAME))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Read the record, filling in the placeholder public URL when absent.
    pub fn load(&self) -> Result<Credentials> {
        let data = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let mut creds: Credentials =
            serde_json::from_str(&data).map_err(|source| UplError::ConfigParse {
                path: self.path.clone(),
                source,
            })?;
        if creds.public_url.is_empty() {
            creds.public_url = DEFAULT_PUBLIC_URL.to_string();
        }
        debug!("loaded credentials for bucket '{}' from {}", creds.bucket, self.path.display());
        Ok(creds)
    }

    /// Write the record with two-space indentation, replacing any previous one.
    pub fn save(&self, creds: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut json = serde_json::to_string_pretty(creds).map_err(|source| UplError::ConfigParse {
            path: self.path.clone(),
            source,
        })?;
        json.push('\n');
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        debug!("saved credentials to {}", self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> UplError {
        UplError::ConfigIo {
            path: self.path.clone(),
            source,
        }
    }
}
