//! Self-update support.
//!
//! The latest release is read from a release-metadata endpoint and compared
//! with the running version. Installing is delegated to an external command
//! behind the [`Installer`] trait, so the distribution channel can change
//! without touching the check.

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::error::{Result, UplError};

pub const RELEASES_URL: &str = "https://api.github.com/repos/nizar0x1f/termup/releases/latest";
pub const RELEASE_URL_ENV: &str = "UPL_RELEASE_URL";

pub const DEFAULT_INSTALL_COMMAND: &str =
    "cargo install --locked --force --git https://github.com/nizar0x1f/termup upl";
pub const INSTALL_COMMAND_ENV: &str = "UPL_INSTALL_COMMAND";

const FEED_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize, Debug, Clone)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    pub available: bool,
    pub current_version: String,
    pub latest_version: Option<String>,
    pub release_url: Option<String>,
    pub release_notes: Option<String>,
}

/// HTTP client for the release-metadata endpoint.
#[derive(Debug, Clone)]
pub struct ReleaseFeed {
    client: Client,
    url: String,
}

impl ReleaseFeed {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(FEED_TIMEOUT)
            .user_agent(concat!("upl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UplError::UpdateCheck(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Feed at `$UPL_RELEASE_URL`, or the project's GitHub releases.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(RELEASE_URL_ENV).unwrap_or_else(|_| RELEASES_URL.to_string());
        Self::new(url)
    }

    pub fn latest(&self) -> Result<Release> {
        debug!("fetching latest release from {}", self.url);
        let res = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| UplError::UpdateCheck(e.to_string()))?;
        let status = res.status();
        if status != reqwest::StatusCode::OK {
            return Err(UplError::UpdateCheck(format!(
                "release feed returned status {}",
                status.as_u16()
            )));
        }
        res.json()
            .map_err(|e| UplError::UpdateCheck(format!("invalid release metadata: {e}")))
    }
}

pub fn check_for_updates(current_version: &str, feed: &ReleaseFeed) -> Result<UpdateInfo> {
    let release = feed.latest()?;
    evaluate(current_version, &release)
}

/// Decide whether `release` is an update over `current_version`.
/// Drafts and prereleases never are.
pub fn evaluate(current_version: &str, release: &Release) -> Result<UpdateInfo> {
    if release.prerelease || release.draft {
        debug!("latest release {} is a draft or prerelease", release.tag_name);
        return Ok(UpdateInfo {
            available: false,
            current_version: current_version.to_string(),
            latest_version: None,
            release_url: None,
            release_notes: None,
        });
    }

    let latest = release.tag_name.trim_start_matches('v').to_string();
    let available = is_newer(&latest, current_version)?;
    debug!("latest {latest}, current {current_version}, newer: {available}");

    Ok(UpdateInfo {
        available,
        current_version: current_version.to_string(),
        latest_version: Some(latest),
        release_url: Some(release.html_url.clone()),
        release_notes: release.body.clone(),
    })
}

/// Numeric comparison of `major.minor.patch` triples.
pub fn is_newer(candidate: &str, current: &str) -> Result<bool> {
    Ok(parse_version(candidate)? > parse_version(current)?)
}

/// Exactly three dot-separated unsigned integers, with an optional leading `v`.
pub fn parse_version(version: &str) -> Result<[u64; 3]> {
    let trimmed = version.strip_prefix('v').unwrap_or(version);
    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() != 3 {
        return Err(UplError::VersionParse(version.to_string()));
    }

    let mut triple = [0u64; 3];
    for (slot, part) in triple.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| UplError::VersionParse(version.to_string()))?;
    }
    Ok(triple)
}

/// Something that can install a newer build of this program.
pub trait Installer {
    /// `Err` carries a human-readable reason why installing cannot work here.
    fn check(&self) -> std::result::Result<(), String>;

    /// Run the install and return its combined output.
    fn install(&self) -> Result<String>;

    /// The command a user can run by hand instead.
    fn command_line(&self) -> String;
}

/// Installer backed by an external package-manager command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
}

impl CommandInstaller {
    /// Split `command_line` on whitespace; `None` if it is empty.
    pub fn new(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    /// `$UPL_INSTALL_COMMAND` if set and non-empty, otherwise `cargo install`
    /// from the project repository.
    pub fn from_env() -> Self {
        std::env::var(INSTALL_COMMAND_ENV)
            .ok()
            .and_then(|line| Self::new(&line))
            .unwrap_or_else(|| Self {
                program: "cargo".to_string(),
                args: DEFAULT_INSTALL_COMMAND
                    .split_whitespace()
                    .skip(1)
                    .map(str::to_string)
                    .collect(),
            })
    }
}

impl Installer for CommandInstaller {
    fn check(&self) -> std::result::Result<(), String> {
        let probe = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if probe.is_err() {
            return Err(format!("{} is not installed or not in PATH", self.program));
        }
        std::env::current_exe()
            .map(|_| ())
            .map_err(|e| format!("cannot determine executable path: {e}"))
    }

    fn install(&self) -> Result<String> {
        debug!("running {}", self.command_line());
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| UplError::Install(format!("{} could not be started: {e}", self.program)))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(UplError::Install(format!(
                "{} failed: {}\nOutput: {}",
                self.command_line(),
                output.status,
                combined.trim_end()
            )));
        }
        Ok(combined)
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
