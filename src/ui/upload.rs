// Upload screen: draws a `TransferSession` and pumps events into it until
// the user leaves.

use crossterm::event::{self, Event, KeyEventKind};
use std::fmt::Write as _;
use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use super::format::{format_bytes, format_duration};
use super::terminal::Terminal;
use super::theme::Theme;
use crate::session::{Flow, Phase, TransferSession, UploadEvent};

const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const BAR_WIDTH: usize = 40;
const TICK: Duration = Duration::from_millis(100);

/// Run the render loop until the user dismisses a finished upload or quits.
///
/// Only the display stops on quit; the transfer thread is left running.
pub fn run_upload_screen(
    session: &mut TransferSession,
    events: &Receiver<UploadEvent>,
    theme: &Theme,
) -> io::Result<()> {
    let mut term = Terminal::enter()?;
    let mut tick = 0usize;

    loop {
        drain_events(session, events);
        term.draw(&render_upload(session, theme, tick, Instant::now()))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && session.handle_key(key) == Flow::Exit {
                    break;
                }
            }
        }
        tick = tick.wrapping_add(1);
    }

    term.draw(&render_upload(session, theme, tick, Instant::now()))
}

/// Apply everything queued so far without blocking.
pub fn drain_events(session: &mut TransferSession, events: &Receiver<UploadEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => session.apply(event),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                session.producer_lost();
                break;
            }
        }
    }
}

/// One frame of the upload screen.
pub fn render_upload(session: &TransferSession, theme: &Theme, tick: usize, now: Instant) -> String {
    let mut b = String::new();

    let _ = writeln!(b, "{}", theme.title.apply(" File Upload "));
    b.push('\n');
    let _ = writeln!(b, "Uploading: {}", theme.filename.apply(session.file_name()));
    b.push('\n');

    match session.phase() {
        Phase::Uploading => {
            let spinner = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
            let _ = writeln!(
                b,
                "{} {}",
                theme.spinner.apply(spinner),
                progress_bar(session.fraction(), theme)
            );
            b.push('\n');

            if session.total() > 0 {
                let eta = session
                    .eta()
                    .map(format_duration)
                    .unwrap_or_else(|| "--:--".to_string());
                let speed = format!("{}/s", format_bytes(session.speed() as u64));
                let _ = writeln!(
                    b,
                    "{} {} {}",
                    theme.stats.apply(format!(
                        "{} / {} ({:.1}%)",
                        format_bytes(session.transferred()),
                        format_bytes(session.total()),
                        session.fraction() * 100.0
                    )),
                    theme.speed.apply(speed),
                    theme.stats.apply(format!("ETA: {eta}"))
                );
                let _ = write!(
                    b,
                    "{}",
                    theme
                        .stats
                        .apply(format!("Elapsed: {}", format_duration(session.elapsed(now))))
                );
            }
        }
        Phase::Succeeded { url } => {
            let _ = writeln!(b, "{}", theme.success.apply("✓ Upload successful!"));
            b.push('\n');
            let _ = writeln!(b, "URL: {}", theme.url.apply(url));
            b.push('\n');
            let _ = write!(b, "{}", theme.help.apply("Press q or enter to exit"));
        }
        Phase::Failed { message } => {
            let _ = writeln!(b, "{}", theme.error.apply("✗ Upload failed"));
            b.push('\n');
            let _ = writeln!(b, "Error: {message}");
            b.push('\n');
            let _ = write!(b, "{}", theme.help.apply("Press q or enter to exit"));
        }
        Phase::CancelledByUser => {
            let _ = write!(b, "{}", theme.help.apply("Upload cancelled"));
        }
    }

    b
}

fn progress_bar(fraction: f64, theme: &Theme) -> String {
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "{}{} {:>3.0}%",
        theme.bar_filled.apply("█".repeat(filled)),
        theme.bar_empty.apply("░".repeat(BAR_WIDTH - filled)),
        fraction * 100.0
    )
}
