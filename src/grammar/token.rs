//! Tokens produced by the lexer and consumed by the parser.

use std::fmt;

use super::automaton::Item;

/// A lexical token of the behavior description language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A reserved word such as `universe`, `rule` or `end`.
    Keyword(String),
    /// A double-quoted literal with escapes resolved.
    Text(String),
    Number(f64),
    /// The input is exhausted.
    End,
}

impl Token {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Keyword(_) => "keyword",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::End => "empty",
        }
    }

    /// The token's literal value as written in error messages.
    pub fn literal(&self) -> String {
        match self {
            Self::Keyword(s) | Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::End => String::new(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(s) => write!(f, "{s}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::End => write!(f, "<end>"),
        }
    }
}

impl Item for Token {
    fn kind(&self) -> &'static str {
        Token::kind(self)
    }

    fn literal(&self) -> String {
        Token::literal(self)
    }
}
