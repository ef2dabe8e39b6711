//! Command-line surface.
//!
//! `upl <file>` uploads, `upl relogin` reconfigures, `upl update` (or
//! `--update`) runs the self-update. A bare `upl` prints usage and fails.

use clap::Parser;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: upl <file-path>
       upl relogin
       upl --help
       upl --version
       upl --update";

const AFTER_HELP: &str = "\
COMMANDS:
    relogin          Reconfigure S3 credentials
    update           Update to the latest version
    help             Print this help message

EXAMPLES:
    upl document.pdf
    upl photo.jpg
    upl relogin

SUPPORTED PROVIDERS:
    Cloudflare R2, AWS S3, MinIO, DigitalOcean Spaces
    and any other S3-compatible storage service";

/// S3 compatible filesharing from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "upl", disable_version_flag = true, after_help = AFTER_HELP)]
pub struct Args {
    /// Path to the file to upload, or a command (relogin, update, help)
    pub target: Option<String>,

    /// Print version information
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Update to the latest version
    #[arg(long)]
    pub update: bool,

    /// Accept invalid TLS certificates from the storage endpoint
    #[arg(long)]
    pub insecure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload { path: PathBuf, insecure_tls: bool },
    Relogin,
    Update,
    Version,
    Help,
    /// Nothing to do: print usage and exit with failure.
    Usage,
}

impl Args {
    pub fn resolve(&self) -> Command {
        if self.version {
            return Command::Version;
        }
        if self.update {
            return Command::Update;
        }
        match self.target.as_deref() {
            None => Command::Usage,
            Some("help") => Command::Help,
            Some("update") => Command::Update,
            Some("relogin") => Command::Relogin,
            Some(path) => Command::Upload {
                path: PathBuf::from(path),
                insecure_tls: self.insecure,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(argv: &[&str]) -> Command {
        Args::parse_from(std::iter::once("upl").chain(argv.iter().copied())).resolve()
    }

    #[test]
    fn test_no_arguments_is_usage() {
        assert_eq!(command(&[]), Command::Usage);
    }

    #[test]
    fn test_file_argument_uploads() {
        assert_eq!(
            command(&["photo.jpg"]),
            Command::Upload {
                path: PathBuf::from("photo.jpg"),
                insecure_tls: false
            }
        );
        assert_eq!(
            command(&["--insecure", "photo.jpg"]),
            Command::Upload {
                path: PathBuf::from("photo.jpg"),
                insecure_tls: true
            }
        );
    }

    #[test]
    fn test_commands() {
        assert_eq!(command(&["relogin"]), Command::Relogin);
        assert_eq!(command(&["update"]), Command::Update);
        assert_eq!(command(&["--update"]), Command::Update);
        assert_eq!(command(&["help"]), Command::Help);
        assert_eq!(command(&["-v"]), Command::Version);
        assert_eq!(command(&["--version"]), Command::Version);
    }

    #[test]
    fn test_help_flag_is_handled_by_clap() {
        let err = Args::try_parse_from(["upl", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
