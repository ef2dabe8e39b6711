// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, find credentials, hand off to the UI.
// - Returns `anyhow::Result` so fatal errors print with their cause chain.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use upl::cli::{Args, Command, USAGE};
use upl::config::CredentialStore;
use upl::storage::{UploadOptions, Uploader};
use upl::ui::{self, theme::Theme};
use upl::update::{CommandInstaller, ReleaseFeed};
use upl::version;

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let theme = Theme::from_env();

    match args.resolve() {
        Command::Upload { path, insecure_tls } => upload(&path, insecure_tls, &theme),
        Command::Relogin => {
            let store = CredentialStore::default_location()?;
            Ok(exit_code(ui::configure(&store, &theme)?.is_some()))
        }
        Command::Update => {
            let feed = ReleaseFeed::from_env()?;
            let installer = CommandInstaller::from_env();
            Ok(exit_code(ui::run_update(version::VERSION, &feed, &installer)?))
        }
        Command::Version => {
            show_version();
            Ok(ExitCode::SUCCESS)
        }
        Command::Help => {
            Args::command().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Usage => {
            println!("{USAGE}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn upload(path: &Path, insecure_tls: bool, theme: &Theme) -> anyhow::Result<ExitCode> {
    let store = CredentialStore::default_location()?;
    let creds = if store.exists().context("checking for config file")? {
        store.load().context("loading config")?
    } else {
        match ui::configure(&store, theme)? {
            Some(creds) => creds,
            None => return Ok(ExitCode::FAILURE),
        }
    };

    let uploader = Uploader::new(creds, UploadOptions::resolve(insecure_tls));

    if std::io::stdout().is_terminal() {
        Ok(exit_code(ui::upload_interactive(uploader, path, theme)?))
    } else {
        ui::upload_plain(&uploader, path)?;
        Ok(ExitCode::SUCCESS)
    }
}

fn show_version() {
    let info = version::build_info();
    println!("{}", info.short());
    println!("S3 compatible filesharing from terminal");
    println!("Built for {}", info.platform);
    if info.is_release() {
        println!("Release: {} (commit: {})", info.date, info.commit);
    } else {
        println!("Development build (commit: {})", info.commit);
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
