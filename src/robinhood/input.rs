//! Terminal input capability
//!
//! The client never touches stdin directly. Prompts for a missing symbol or
//! for login credentials go through an [`InputProvider`], so headless callers
//! can supply answers from elsewhere.

use std::io::{self, BufRead, Write};

pub trait InputProvider: Send + Sync {
    /// Show `prompt` and read one line
    fn read_line(&self, prompt: &str) -> io::Result<String>;

    /// Show `prompt` and read one line without echoing it
    fn read_secret(&self, prompt: &str) -> io::Result<String>;
}

/// Prompts on stdout, reads stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalInput;

impl InputProvider for TerminalInput {
    fn read_line(&self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(strip_newline(line))
    }

    fn read_secret(&self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

fn strip_newline(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}
