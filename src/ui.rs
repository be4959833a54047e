// UI layer: JSON rendering, interactive prompts using `dialoguer`, and the
// spinner shown while a remote call blocks.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::cell::RefCell;
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

/// Source of interactive answers. The terminal implementation uses
/// dialoguer; tests script the answers.
pub trait Prompt {
    fn input(&self, label: &str) -> Result<String>;
    /// Like `input`, but the answer is not echoed.
    fn password(&self, label: &str) -> Result<String>;
    fn confirm(&self, label: &str) -> Result<bool>;
}

/// Prompts on the controlling terminal. When stdin is piped, answers are
/// read line by line from it instead.
pub struct TerminalPrompt {
    piped: Option<LinePrompt<io::StdinLock<'static>>>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        let stdin = io::stdin();
        let piped = (!stdin.is_terminal()).then(|| LinePrompt::new(stdin.lock()));
        TerminalPrompt { piped }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn input(&self, label: &str) -> Result<String> {
        if let Some(piped) = &self.piped {
            return piped.input(label);
        }
        let value: String = Input::new().with_prompt(label).interact_text()?;
        Ok(value)
    }

    fn password(&self, label: &str) -> Result<String> {
        if let Some(piped) = &self.piped {
            return piped.password(label);
        }
        Ok(Password::new().with_prompt(label).interact()?)
    }

    fn confirm(&self, label: &str) -> Result<bool> {
        if let Some(piped) = &self.piped {
            return piped.confirm(label);
        }
        Ok(Confirm::new().with_prompt(label).default(false).interact()?)
    }
}

/// Reads one answer per line from `reader`, printing labels to stderr.
pub struct LinePrompt<R> {
    reader: RefCell<R>,
}

impl<R: BufRead> LinePrompt<R> {
    pub fn new(reader: R) -> Self {
        LinePrompt {
            reader: RefCell::new(reader),
        }
    }

    /// Next line without its line ending, `None` at end of input.
    fn read_line(&self, label: &str) -> Result<Option<String>> {
        eprint!("{}: ", label);
        let mut line = String::new();
        let n = self
            .reader
            .borrow_mut()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead> Prompt for LinePrompt<R> {
    fn input(&self, label: &str) -> Result<String> {
        match self.read_line(label)? {
            Some(line) => Ok(line),
            None => anyhow::bail!("No answer for '{}' on stdin", label),
        }
    }

    fn password(&self, label: &str) -> Result<String> {
        self.input(label)
    }

    /// Only `Y`/`y` confirms; anything else, including end of input, declines.
    fn confirm(&self, label: &str) -> Result<bool> {
        let answer = self.read_line(&format!("{} [Y/N]", label))?;
        Ok(answer.map_or(false, |a| a.trim().eq_ignore_ascii_case("y")))
    }
}

/// Pretty-print a JSON document.
pub fn render(out: &mut dyn Write, value: &Value) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Spinner on stderr. indicatif keeps it hidden when stderr is not a
/// terminal, so piped output stays clean.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
