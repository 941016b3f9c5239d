//! Line editor helper: command and name completion, hints, highlighting.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub const COMMANDS: &[&str] = &[
    "/list", "/history", "/restart", "/reload", "/consume", "/share", "/decode", "/help", "/quit",
];

/// CLI helper for rustyline that completes commands and character names.
#[derive(Clone, Default)]
pub struct CliHelper {
    names: Vec<String>,
}

impl CliHelper {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn set_names(&mut self, names: Vec<String>) {
        self.names = names;
    }

    /// Commands starting with `line`, or names containing it.
    fn completions(&self, line: &str) -> Vec<String> {
        if line.starts_with('/') {
            return COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| cmd.to_string())
                .collect();
        }

        let needle = line.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.names
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Remaining text of the first command or name that `line` is a prefix of.
    fn inline_hint(&self, line: &str) -> Option<String> {
        if line.is_empty() {
            return None;
        }

        if line.starts_with('/') {
            if line.contains(' ') {
                return None;
            }
            return COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string());
        }

        let lower = line.to_lowercase();
        self.names
            .iter()
            .find(|name| name.len() > line.len() && name.to_lowercase().starts_with(&lower))
            .and_then(|name| name.get(line.len()..))
            .map(str::to_string)
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .completions(&line[..pos])
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        self.inline_hint(&line[..pos])
    }
}

impl Validator for CliHelper {}
