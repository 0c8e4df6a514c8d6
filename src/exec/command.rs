// src/exec/command.rs

use std::fmt;

/// A command line split on whitespace.
///
/// The first token is the program, the remaining tokens are passed verbatim
/// as arguments. There is no shell involved and no quoting or escaping:
/// `echo "a b"` runs `echo` with the two arguments `"a` and `b"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split `line`; returns `None` if it contains no tokens.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().map(str::to_string);
        let program = tokens.next()?;
        Some(Self {
            program,
            args: tokens.collect(),
        })
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
