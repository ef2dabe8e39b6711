//! Upload session state.
//!
//! The transfer runs on a background thread and talks to the foreground loop
//! through a one-way channel of [`UploadEvent`]s. The foreground owns a
//! [`TransferSession`] and only ever changes it by applying events or key
//! presses, so nothing is shared between the two threads.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::UplError;
use crate::storage::Uploader;

/// One message from the transfer thread. Progress counts arrive in emission
/// order; at most one `Complete` or `Failed` follows, and nothing after it.
#[derive(Debug)]
pub enum UploadEvent {
    /// Cumulative byte count, stamped when the read happened. The render loop
    /// drains in batches, so receive time says nothing about throughput.
    Progress { bytes: u64, at: Instant },
    Complete(String),
    Failed(UplError),
}

/// Start the upload on a detached thread and return the event stream.
///
/// Dropping the receiver does not stop the transfer; the thread keeps going
/// until the request finishes or the process exits.
pub fn spawn_upload(uploader: Uploader, path: PathBuf) -> Receiver<UploadEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let progress_tx = tx.clone();
        let result = uploader.upload(
            &path,
            Some(Box::new(move |bytes| {
                let _ = progress_tx.send(UploadEvent::Progress {
                    bytes,
                    at: Instant::now(),
                });
            })),
        );
        let event = match result {
            Ok(url) => UploadEvent::Complete(url),
            Err(e) => UploadEvent::Failed(e),
        };
        let _ = tx.send(event);
    });
    rx
}

#[derive(Debug)]
pub enum Phase {
    Uploading,
    Succeeded { url: String },
    Failed { message: String },
    CancelledByUser,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Uploading)
    }
}

/// What the render loop should do after handling input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Display-side view of one transfer.
#[derive(Debug)]
pub struct TransferSession {
    file_name: String,
    total: u64,
    transferred: u64,
    started_at: Instant,
    last_sample_at: Instant,
    last_sample_bytes: u64,
    /// Bytes per second between the two most recent samples.
    speed: f64,
    phase: Phase,
}

impl TransferSession {
    pub fn new(file_name: impl Into<String>, total: u64, now: Instant) -> Self {
        Self {
            file_name: file_name.into(),
            total,
            transferred: 0,
            started_at: now,
            last_sample_at: now,
            last_sample_bytes: 0,
            speed: 0.0,
            phase: Phase::Uploading,
        }
    }

    pub fn apply(&mut self, event: UploadEvent) {
        if self.phase.is_terminal() {
            debug!("ignoring {event:?} after terminal state");
            return;
        }
        match event {
            UploadEvent::Progress { bytes, at } => self.record_progress(bytes, at),
            UploadEvent::Complete(url) => self.phase = Phase::Succeeded { url },
            UploadEvent::Failed(err) => {
                self.phase = Phase::Failed {
                    message: error_chain(&err),
                }
            }
        }
    }

    /// The transfer thread went away without a terminal event.
    pub fn producer_lost(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = Phase::Failed {
                message: "upload stopped unexpectedly".to_string(),
            };
        }
    }

    fn record_progress(&mut self, bytes: u64, at: Instant) {
        if bytes < self.transferred {
            // A rewind inside the HTTP client; keep the displayed count monotonic.
            return;
        }
        if bytes > self.last_sample_bytes {
            let elapsed = at.saturating_duration_since(self.last_sample_at).as_secs_f64();
            if elapsed > 0.0 {
                self.speed = (bytes - self.last_sample_bytes) as f64 / elapsed;
            }
        }
        self.transferred = bytes;
        self.last_sample_at = at;
        self.last_sample_bytes = bytes;
    }

    /// Ctrl+C/Esc quit at any time; q/Enter dismiss a finished session.
    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let quit = matches!(key.code, KeyCode::Esc)
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
        let dismiss = matches!(key.code, KeyCode::Enter | KeyCode::Char('q'));

        match self.phase {
            Phase::Uploading if quit => {
                self.phase = Phase::CancelledByUser;
                Flow::Exit
            }
            Phase::Uploading => Flow::Continue,
            _ if quit || dismiss => Flow::Exit,
            _ => Flow::Continue,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Fraction in `[0, 1]`; zero for an empty file.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.transferred as f64 / self.total as f64).min(1.0)
    }

    /// Remaining time at the current speed, unknown until data has moved.
    pub fn eta(&self) -> Option<Duration> {
        if self.speed <= 0.0 || self.transferred == 0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.transferred) as f64;
        Some(Duration::from_secs_f64(remaining / self.speed))
    }

    /// Process exit status for the final phase.
    pub fn succeeded(&self) -> bool {
        matches!(self.phase, Phase::Succeeded { .. })
    }
}

fn error_chain(err: &UplError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
