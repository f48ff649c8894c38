// src/exec/command.rs

use std::fmt;

use crate::exec::tokenizer::{tokenize, TokenizeError};

/// A tokenized command: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Tokenize a raw command string.
    pub fn parse(raw: &str) -> Result<Self, TokenizeError> {
        let mut tokens = tokenize(raw)?.into_iter();
        let program = tokens.next().ok_or(TokenizeError::Empty)?;
        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }
}

/// Renders the command the way it is echoed in verbose mode: arguments that
/// contain whitespace are shown quoted.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.chars().any(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Exit status of a stage that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    /// Non-zero exit; `-1` when the process was killed by a signal.
    Failed(i32),
}

impl StageOutcome {
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        if status.success() {
            StageOutcome::Success
        } else {
            StageOutcome::Failed(status.code().unwrap_or(-1))
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, StageOutcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_program_and_args() {
        let cmd = CommandLine::parse(r#"go test -run "Test Foo""#).unwrap();
        assert_eq!(cmd, CommandLine::new("go", ["test", "-run", "Test Foo"]));
    }

    #[test]
    fn display_quotes_whitespace_args() {
        let cmd = CommandLine::new("echo", ["plain", "two words"]);
        assert_eq!(cmd.to_string(), r#"echo plain "two words""#);
    }

    #[test]
    fn display_of_bare_program() {
        assert_eq!(CommandLine::new("make", Vec::<String>::new()).to_string(), "make");
    }
}
