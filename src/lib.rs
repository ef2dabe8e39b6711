// Library root
// -----------
// This crate exposes the pieces of the `upl` CLI as a library. The binary
// (`main.rs`) parses arguments and dispatches to these modules.
//
// Module responsibilities:
// - `storage`: the transfer engine. Opens the file, counts bytes as the
//   HTTP client reads them, and PUTs the object to an S3-compatible store.
// - `session`: the background transfer thread and the state the upload
//   screen derives from its events (bytes, speed, ETA, outcome).
// - `ui`: terminal screens for uploading and first-run configuration, plus
//   the interactive update flow.
// - `config`: the credentials file in the user's home directory.
// - `update`: release check and external installer.
// - `cli`, `version`, `error`: argument surface, build info, error types.
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod ui;
pub mod update;
pub mod version;

pub use error::{Result, UplError};
