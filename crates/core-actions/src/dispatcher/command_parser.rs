//! Ex command line parsing.
//!
//! Converts the text typed after `:` into an [`ExCommand`]. Pure
//! classification; execution lives in `command`.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// Nothing typed.
    Empty,
    /// `q`, `qa`, `q!`, `qa!`.
    Quit,
    /// `w` or `w <path>`.
    Write(Option<PathBuf>),
    /// `wq`, `wqa`, `wqa!`, `x`, optionally with a path.
    WriteQuit(Option<PathBuf>),
    /// `e <path>`.
    Edit(Option<PathBuf>),
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ExCommand {
        let s = raw.trim();
        if s.is_empty() {
            return ExCommand::Empty;
        }
        let (name, arg) = match s.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim_start())),
            None => (s, None),
        };
        let path = arg.filter(|a| !a.is_empty()).map(PathBuf::from);
        match name {
            "q" | "qa" | "q!" | "qa!" if path.is_none() => ExCommand::Quit,
            "w" => ExCommand::Write(path),
            "wq" | "wqa" | "wqa!" | "x" => ExCommand::WriteQuit(path),
            "e" => ExCommand::Edit(path),
            _ => ExCommand::Unknown(s.to_string()),
        }
    }
}
