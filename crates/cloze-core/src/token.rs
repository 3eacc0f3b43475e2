//! Blank token scanner.
//!
//! Recognises `{<digits>:SHORTANSWER:=<rhs>}` and `{<digits>:NUMERICAL:=<rhs>}`
//! inside prompt text. Anything else, including brace sequences that almost
//! match, is ordinary prompt text.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(\d+):(SHORTANSWER|NUMERICAL):=([^}]+)\}").expect("token grammar is valid")
});

/// The kind of blank a token declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Case-insensitive text answer with `|`-separated variants.
    ShortAnswer,
    /// Decimal answer with an optional `±` tolerance.
    Numerical,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::ShortAnswer => write!(f, "SHORTANSWER"),
            TokenKind::Numerical => write!(f, "NUMERICAL"),
        }
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHORTANSWER" => Ok(TokenKind::ShortAnswer),
            "NUMERICAL" => Ok(TokenKind::Numerical),
            other => Err(format!("unknown blank kind: {other}")),
        }
    }
}

/// One raw blank found in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Digits exactly as written, leading zeros included.
    pub slot_id: String,
    pub kind: TokenKind,
    /// Everything after `:=` up to the closing brace, untrimmed.
    pub rhs: String,
    /// Byte offset of the opening brace.
    pub start: usize,
    /// Byte offset one past the closing brace.
    pub end: usize,
}

/// Scan `prompt` left to right and return every blank token in textual order.
pub fn parse(prompt: &str) -> Vec<Token> {
    TOKEN_RE
        .captures_iter(prompt)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = caps[2].parse().ok()?;
            Some(Token {
                slot_id: caps[1].to_string(),
                kind,
                rhs: caps[3].to_string(),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}
