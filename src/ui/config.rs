// First-run configuration screen: five prompts answered with raw key
// presses, ending in a credentials record the caller persists.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::fmt::Write as _;
use std::io;

use super::paste::{is_printable_ascii, sanitize_paste};
use super::terminal::Terminal;
use super::theme::Theme;
use crate::config::{Credentials, DEFAULT_PUBLIC_URL};
use crate::session::Flow;

const PROMPTS: [&str; 5] = [
    "Enter Access Key ID:",
    "Enter Secret Access Key:",
    "Enter Bucket Name:",
    "Enter S3 Endpoint:",
    "Enter Public URL (press enter for default):",
];

const STEP_PUBLIC_URL: usize = 4;

#[derive(Debug, Default)]
pub struct ConfigSession {
    step: usize,
    answers: [String; 5],
    current: String,
    aborted: bool,
}

impl ConfigSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &Event) -> Flow {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Paste(text) => {
                self.current.push_str(&sanitize_paste(text));
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if self.step >= PROMPTS.len() {
            return Flow::Exit;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return self.abort(),
            KeyCode::Char('c') if ctrl => return self.abort(),
            KeyCode::Char('u') if ctrl => self.current.clear(),
            KeyCode::Enter => {
                self.answers[self.step] = std::mem::take(&mut self.current);
                self.step += 1;
                if self.is_finished() {
                    return Flow::Exit;
                }
            }
            KeyCode::Backspace => {
                self.current.pop();
            }
            KeyCode::Char(c) if !ctrl && is_printable_ascii(c) => self.current.push(c),
            _ => {}
        }
        Flow::Continue
    }

    fn abort(&mut self) -> Flow {
        self.aborted = true;
        Flow::Exit
    }

    pub fn is_finished(&self) -> bool {
        !self.aborted && self.step >= PROMPTS.len()
    }

    /// The collected record, once every prompt has been answered.
    pub fn credentials(&self) -> Option<Credentials> {
        if !self.is_finished() {
            return None;
        }
        let answer = |i: usize| self.answers[i].trim().to_string();
        let public_url = match answer(STEP_PUBLIC_URL) {
            url if url.is_empty() => DEFAULT_PUBLIC_URL.to_string(),
            url => url,
        };
        Some(Credentials {
            access_key_id: answer(0),
            secret_access_key: answer(1),
            bucket: answer(2),
            endpoint: answer(3),
            public_url,
        })
    }

    pub fn render(&self, theme: &Theme) -> String {
        let mut b = String::new();
        let _ = writeln!(b, "{}", theme.title.apply(" S3 Storage Configuration "));
        b.push('\n');

        let Some(prompt) = PROMPTS.get(self.step) else {
            let _ = write!(b, "Configuration complete!");
            return b;
        };

        let _ = writeln!(b, "{}", theme.prompt.apply(prompt));
        let _ = writeln!(b, "{}", theme.input.apply(format!("{}█", self.current)));
        b.push('\n');
        if self.step == STEP_PUBLIC_URL {
            let _ = writeln!(b, "{}", theme.help.apply(format!("Default: {DEFAULT_PUBLIC_URL}")));
            b.push('\n');
        }
        let _ = writeln!(
            b,
            "{}",
            theme.help.apply("Press Enter to continue, Ctrl+C to quit, Ctrl+U to clear")
        );
        let _ = write!(
            b,
            "{}",
            theme.help.apply("Tip: Paste works with Ctrl+V, Cmd+V, or right-click")
        );
        b
    }
}

/// Ask for credentials interactively. `None` when the user aborts.
pub fn run_config_screen(theme: &Theme) -> io::Result<Option<Credentials>> {
    let mut session = ConfigSession::new();
    let mut term = Terminal::enter()?;

    loop {
        term.draw(&session.render(theme))?;
        if session.handle_event(&event::read()?) == Flow::Exit {
            break;
        }
    }

    term.draw(&session.render(theme))?;
    Ok(session.credentials())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(s: &mut ConfigSession, code: KeyCode) -> Flow {
        s.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_line(s: &mut ConfigSession, text: &str) -> Flow {
        for c in text.chars() {
            press(s, KeyCode::Char(c));
        }
        press(s, KeyCode::Enter)
    }

    #[test]
    fn test_collects_five_answers() {
        let mut s = ConfigSession::new();
        assert_eq!(type_line(&mut s, "AKIAEXAMPLE"), Flow::Continue);
        assert_eq!(type_line(&mut s, "secret"), Flow::Continue);
        assert_eq!(type_line(&mut s, " media "), Flow::Continue);
        assert_eq!(type_line(&mut s, "https://r2.example.com"), Flow::Continue);
        assert_eq!(type_line(&mut s, "https://cdn.example.com/"), Flow::Exit);

        let creds = s.credentials().unwrap();
        assert_eq!(creds.access_key_id, "AKIAEXAMPLE");
        assert_eq!(creds.secret_access_key, "secret");
        assert_eq!(creds.bucket, "media");
        assert_eq!(creds.endpoint, "https://r2.example.com");
        assert_eq!(creds.public_url, "https://cdn.example.com/");
    }

    #[test]
    fn test_empty_public_url_uses_default() {
        let mut s = ConfigSession::new();
        for answer in ["a", "b", "c", "d", ""] {
            type_line(&mut s, answer);
        }
        assert_eq!(s.credentials().unwrap().public_url, DEFAULT_PUBLIC_URL);
    }

    #[test]
    fn test_backspace_and_clear_line() {
        let mut s = ConfigSession::new();
        type_line(&mut s, "");
        for c in "abc".chars() {
            press(&mut s, KeyCode::Char(c));
        }
        press(&mut s, KeyCode::Backspace);
        assert_eq!(s.current, "ab");

        s.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(s.current, "");
    }

    #[test]
    fn test_paste_is_sanitized() {
        let mut s = ConfigSession::new();
        s.handle_event(&Event::Paste("[https://x.com]".into()));
        assert_eq!(s.current, "https://x.com");

        s.handle_event(&Event::Paste("\x07[hi]".into()));
        assert_eq!(s.current, "https://x.com[hi]");
    }

    #[test]
    fn test_escape_aborts_without_credentials() {
        let mut s = ConfigSession::new();
        type_line(&mut s, "key");
        assert_eq!(press(&mut s, KeyCode::Esc), Flow::Exit);
        assert!(!s.is_finished());
        assert!(s.credentials().is_none());
    }

    #[test]
    fn test_render_shows_current_prompt() {
        let mut s = ConfigSession::new();
        let theme = Theme::plain();
        assert!(s.render(&theme).contains("Enter Access Key ID:"));

        for answer in ["a", "b", "c", "d"] {
            type_line(&mut s, answer);
        }
        press(&mut s, KeyCode::Char('x'));
        let frame = s.render(&theme);
        assert!(frame.contains("Enter Public URL"));
        assert!(frame.contains("x█"));
        assert!(frame.contains(DEFAULT_PUBLIC_URL));
    }
}
