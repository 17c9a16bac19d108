//! Command line: `cadenza [IMPORT_DIR]` starts the player; `login`,
//! `register` and `logout` manage the stored session and exit.

use std::io::{self, Write};
use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::api::{self, MusicApi};
use crate::error::{Error, Result};
use crate::persist::KeyValueStorage;

pub const USAGE: &str = "usage: cadenza [IMPORT_DIR]
       cadenza login <email>
       cadenza register <username> <email>
       cadenza logout";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play { import_dir: Option<PathBuf> },
    Login { email: String },
    Register { username: String, email: String },
    Logout,
    Help,
}

pub fn parse<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let words: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = match words.as_slice() {
        [] => Command::Play { import_dir: None },
        ["-h" | "--help" | "help"] => Command::Help,
        ["login", email] => Command::Login {
            email: email.to_string(),
        },
        ["register", username, email] => Command::Register {
            username: username.to_string(),
            email: email.to_string(),
        },
        ["logout"] => Command::Logout,
        ["login" | "register" | "logout", ..] => {
            return Err(Error::Validation(USAGE.to_string()));
        }
        [dir] => Command::Play {
            import_dir: Some(PathBuf::from(dir)),
        },
        _ => return Err(Error::Validation(USAGE.to_string())),
    };
    Ok(command)
}

#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Typing,
    Done,
    Cancelled,
}

/// Apply one key press to a hidden input buffer.
fn enter_key(buf: &mut String, key: KeyEvent) -> Entry {
    if key.kind != KeyEventKind::Press {
        return Entry::Typing;
    }
    match key.code {
        KeyCode::Enter => Entry::Done,
        KeyCode::Esc => Entry::Cancelled,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Entry::Cancelled,
        KeyCode::Char(c) => {
            buf.push(c);
            Entry::Typing
        }
        KeyCode::Backspace => {
            buf.pop();
            Entry::Typing
        }
        _ => Entry::Typing,
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Read a password without echoing it.
fn prompt_password(label: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}: ")?;
    stdout.flush()?;

    let mut buf = String::new();
    let outcome = {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                match enter_key(&mut buf, key) {
                    Entry::Typing => continue,
                    done => break done,
                }
            }
        }
    };
    writeln!(stdout)?;

    match outcome {
        Entry::Cancelled => Err(Error::Validation("Cancelled".to_string())),
        _ => Ok(buf),
    }
}

/// Run a session command. Returns the line to print on success.
pub fn run_session_command(
    command: Command,
    api: &mut MusicApi,
    storage: &dyn KeyValueStorage,
) -> Result<String> {
    match command {
        Command::Login { email } => {
            let password = prompt_password("Password")?;
            let session = api::login(api, storage, &email, &password)?;
            Ok(match session.user {
                Some(user) if !user.username.is_empty() => format!("Logged in as {}", user.username),
                _ => format!("Logged in as {email}"),
            })
        }
        Command::Register { username, email } => {
            let password = prompt_password("Password")?;
            let confirm = prompt_password("Confirm password")?;
            api::register(api, storage, &username, &email, &password, &confirm)?;
            Ok(format!("Registered {username}"))
        }
        Command::Logout => {
            api::logout(api, storage)?;
            Ok("Logged out".to_string())
        }
        Command::Help | Command::Play { .. } => Ok(USAGE.to_string()),
    }
}
