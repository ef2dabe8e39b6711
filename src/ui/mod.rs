// UI layer: the interactive flows behind each command. Screens are drawn
// with crossterm in raw mode; the one yes/no question in the update flow
// uses `dialoguer`. Functions are small and synchronous.

pub mod config;
pub mod format;
pub mod paste;
pub mod terminal;
pub mod theme;
pub mod upload;

use anyhow::{Context, Result};
use dialoguer::Confirm;
use std::path::Path;
use std::time::Instant;

use crate::config::{CredentialStore, Credentials};
use crate::error::UplError;
use crate::session::{spawn_upload, TransferSession};
use crate::storage::Uploader;
use crate::update::{self, Installer, ReleaseFeed, UpdateInfo};
use theme::Theme;

/// Run the configuration screen and persist the result.
/// Returns `None` when the user quit before answering every prompt.
pub fn configure(store: &CredentialStore, theme: &Theme) -> Result<Option<Credentials>> {
    let Some(creds) = config::run_config_screen(theme).context("running config UI")? else {
        return Ok(None);
    };
    store.save(&creds).context("saving config")?;
    println!("Configuration saved to {}", store.path().display());
    Ok(Some(creds))
}

/// Upload with the live progress screen. Returns whether the upload succeeded;
/// a cancelled or failed upload returns `false`.
pub fn upload_interactive(uploader: Uploader, path: &Path, theme: &Theme) -> Result<bool> {
    let total = file_size(path)?;
    let events = spawn_upload(uploader, path.to_path_buf());
    let mut session = TransferSession::new(path.display().to_string(), total, Instant::now());

    upload::run_upload_screen(&mut session, &events, theme).context("running upload UI")?;
    Ok(session.succeeded())
}

/// Upload without a screen: the engine draws its own bar on stderr and the
/// URL is printed alone on stdout.
pub fn upload_plain(uploader: &Uploader, path: &Path) -> Result<()> {
    file_size(path)?;
    let url = uploader.upload(path, None)?;
    println!("{url}");
    Ok(())
}

/// Size of a regular file, checked before any network work starts.
fn file_size(path: &Path) -> Result<u64, UplError> {
    let meta = std::fs::metadata(path).map_err(|source| UplError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_file() {
        return Err(UplError::FileAccess {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    Ok(meta.len())
}

/// Check the release feed and, after confirmation, run the installer.
/// Returns `false` when the check or the install failed.
pub fn run_update(current_version: &str, feed: &ReleaseFeed, installer: &dyn Installer) -> Result<bool> {
    println!("Checking for updates...");

    if let Err(reason) = installer.check() {
        println!("Self-update not available: {reason}");
        println!("\nPlease update manually using: {}", installer.command_line());
        return Ok(true);
    }

    let info = match update::check_for_updates(current_version, feed) {
        Ok(info) => info,
        Err(e) => {
            println!("Error checking for updates: {e}");
            println!("\nYou can manually update using:");
            println!("  {}", installer.command_line());
            return Ok(false);
        }
    };

    let Some(latest) = info.latest_version.as_deref().filter(|_| info.available) else {
        println!("✅ You're already running the latest version ({})", info.current_version);
        return Ok(true);
    };

    println!("🚀 Update available!");
    println!("Current version: {}", info.current_version);
    println!("Latest version:  {latest}");
    print!("{}", release_summary(&info));

    let proceed = Confirm::new()
        .with_prompt("Do you want to update now?")
        .default(false)
        .interact()?;
    if !proceed {
        println!("Update cancelled.");
        println!("\nTo update later, run: upl --update");
        println!("Or manually: {}", installer.command_line());
        return Ok(true);
    }

    println!("\n⬇️  Updating upl...");
    match installer.install() {
        Ok(_) => {
            println!("✅ Update completed successfully!");
            println!("The new version will be available the next time you run 'upl'");
            Ok(true)
        }
        Err(e) => {
            println!("❌ Update failed: {e}");
            println!("\nPlease update manually using: {}", installer.command_line());
            Ok(false)
        }
    }
}

/// Release link and notes, as shown before the confirmation prompt.
fn release_summary(info: &UpdateInfo) -> String {
    let mut out = String::new();
    if let Some(url) = info.release_url.as_deref().filter(|u| !u.is_empty()) {
        out.push_str(&format!("\nRelease notes: {url}\n"));
    }
    if let Some(notes) = info.release_notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        out.push_str(&format!("\n{notes}\n"));
    }
    out.push('\n');
    out
}
