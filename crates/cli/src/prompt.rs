//! Terminal stand-ins for the browser's confirm() and prompt() dialogs.

use std::io::{self, BufRead, Write};

use alignchart_engine::chart::Confirm;

/// Read one line from `input` after showing `message` on stderr.
/// None on EOF or read error.
fn ask<R: BufRead>(input: &mut R, message: &str) -> Option<String> {
    eprint!("{} ", message);
    let _ = io::stderr().flush();
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks on the terminal; anything but "y"/"yes" declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        let stdin = io::stdin();
        let answer = ask(&mut stdin.lock(), &format!("{} [y/N]", prompt));
        answer.as_deref().map(is_yes).unwrap_or(false)
    }
}

/// Free-text prompt for an image URL. Empty answers come back as None.
pub fn prompt_url() -> Option<String> {
    let stdin = io::stdin();
    ask(&mut stdin.lock(), "Enter image URL:")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
