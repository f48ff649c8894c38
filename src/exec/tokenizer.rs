// src/exec/tokenizer.rs

//! Shell-like splitting of a raw command string.
//!
//! Splitting is a small state machine that only finds token boundaries; the
//! raw token text keeps its escapes. [`unescape`] then rewrites `\ `, `\"`
//! and `\\`, in that order.
//!
//! The grammar is best-effort: an unterminated quote runs to the end of the
//! input and a trailing backslash is kept as-is. Nothing except an empty
//! command is rejected.

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("command contains no program")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Bare,
    Quoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Between,
    Bare,
    Quoted,
    /// The previous character was a backslash; the next one is taken as-is.
    Escape(Context),
}

impl From<Context> for State {
    fn from(ctx: Context) -> Self {
        match ctx {
            Context::Bare => State::Bare,
            Context::Quoted => State::Quoted,
        }
    }
}

/// Split `input` into raw tokens (escapes intact, surrounding quotes removed).
pub fn split_raw(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut state = State::Between;

    for c in input.chars() {
        state = match state {
            State::Between if c.is_whitespace() => State::Between,
            State::Between if c == '"' => State::Quoted,
            State::Between | State::Bare if c == '\\' => {
                buf.push(c);
                State::Escape(Context::Bare)
            }
            State::Between => {
                buf.push(c);
                State::Bare
            }
            State::Bare if c.is_whitespace() => {
                tokens.push(std::mem::take(&mut buf));
                State::Between
            }
            State::Bare => {
                buf.push(c);
                State::Bare
            }
            State::Quoted if c == '"' => {
                tokens.push(std::mem::take(&mut buf));
                State::Between
            }
            State::Quoted => {
                buf.push(c);
                if c == '\\' {
                    State::Escape(Context::Quoted)
                } else {
                    State::Quoted
                }
            }
            State::Escape(ctx) => {
                buf.push(c);
                ctx.into()
            }
        };
    }

    match state {
        State::Between => {}
        State::Bare | State::Escape(Context::Bare) => tokens.push(buf),
        State::Quoted | State::Escape(Context::Quoted) => {
            warn!(command = %input, "unterminated quote; using the rest of the line as one argument");
            tokens.push(buf);
        }
    }

    tokens
}

/// Replace `\ `, `\"` and `\\` with their single-character forms.
///
/// Order matters: with `\\` first, the token `\\"` would become `"` instead
/// of `\"`.
pub fn unescape(token: &str) -> String {
    token
        .replace("\\ ", " ")
        .replace("\\\"", "\"")
        .replace("\\\\", "\\")
}

/// Split and unescape `raw`. The first token is the program.
pub fn tokenize(raw: &str) -> Result<Vec<String>, TokenizeError> {
    let tokens: Vec<String> = split_raw(raw).iter().map(|t| unescape(t)).collect();
    if tokens.is_empty() {
        return Err(TokenizeError::Empty);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        tokenize(s).unwrap()
    }

    #[test]
    fn quotes_and_escaped_spaces() {
        assert_eq!(toks(r#"foo "bar baz" qux\ quux"#), vec!["foo", "bar baz", "qux quux"]);
    }

    #[test]
    fn runs_of_whitespace_separate_tokens() {
        assert_eq!(toks("  go\t test   ./... "), vec!["go", "test", "./..."]);
    }

    #[test]
    fn escaped_quote_does_not_close_quoted_run() {
        assert_eq!(toks(r#"echo "say \"hi\" now""#), vec!["echo", r#"say "hi" now"#]);
    }

    #[test]
    fn escaped_backslash_is_unescaped_last() {
        assert_eq!(toks(r"printf a\\b"), vec!["printf", r"a\b"]);
        assert_eq!(unescape(r#"\\""#), r#"\""#);
    }

    #[test]
    fn other_escapes_are_kept_literally() {
        assert_eq!(toks(r"grep a\tb"), vec!["grep", r"a\tb"]);
    }

    #[test]
    fn quote_inside_bare_token_is_literal() {
        assert_eq!(toks(r#"--name=a"b"#), vec![r#"--name=a"b"#]);
    }

    #[test]
    fn empty_quotes_give_empty_argument() {
        assert_eq!(toks(r#"cmd "" x"#), vec!["cmd", "", "x"]);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(toks(r#"echo "a b"#), vec!["echo", "a b"]);
    }

    #[test]
    fn trailing_backslash_is_kept() {
        assert_eq!(toks(r"echo a\"), vec!["echo", r"a\"]);
    }

    #[test]
    fn leading_escaped_space_starts_a_token() {
        assert_eq!(toks(r"\ x y"), vec![" x", "y"]);
    }

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(tokenize(""), Err(TokenizeError::Empty));
        assert_eq!(tokenize(" \t "), Err(TokenizeError::Empty));
    }
}
