//! Runs the `upl` binary with piped stdio, which selects the
//! non-interactive upload path.

mod common;

use std::process::{Command, Output};

use tempfile::TempDir;
use upl::config::{CredentialStore, CONFIG_PATH_ENV};

use common::{credentials, fixture_file, mock_server};

fn upl(args: &[&str], config: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_upl"))
        .args(args)
        .env(CONFIG_PATH_ENV, config)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_no_arguments_prints_usage_and_fails() {
    let dir = TempDir::new().unwrap();
    let out = upl(&[], &dir.path().join("upl.json"));

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage: upl <file-path>"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    let out = upl(&["-v"], &dir.path().join("upl.json"));

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with(&format!("upl v{}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_missing_file_fails_before_network() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("upl.json");
    CredentialStore::at(&config)
        .save(&credentials("http://127.0.0.1:9"))
        .unwrap();

    let missing = dir.path().join("nope.txt");
    let out = upl(&[missing.to_str().unwrap()], &config);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot access"));
}

#[test]
fn test_piped_upload_prints_url() {
    let dir = TempDir::new().unwrap();
    let (endpoint, server) = mock_server(200, "");
    let config = dir.path().join("upl.json");
    CredentialStore::at(&config).save(&credentials(&endpoint)).unwrap();
    let path = fixture_file(dir.path(), "notes.txt", 2048);

    let out = upl(&[path.to_str().unwrap()], &config);
    let request = server.join().unwrap();

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "https://cdn.example.com/notes.txt\n"
    );
    assert_eq!(request.path, "/media/notes.txt");
}
