//! Lexer: characters → tokens, driven by a lexical grammar.
//!
//! The lexer owns a character automaton. Each pull runs the automaton until
//! one of its transitions emits a token, so the parser sees exactly one token
//! of lookahead and the source is never read further than needed.
//!
//! Character classes the lexical grammar may name: `digit`, `letter`,
//! `quote`, `backslash`, `hyphen`, `dot`, `blank` (whitespace), `comma`,
//! `any` (every character) and `empty` (end of input).
//!
//! Operations: `push` appends the current character to the buffer;
//! `keyword`, `text` and `number` turn the buffer into a token.

use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use super::automaton::{Automaton, Class, Grammar, Item, Operation, Operator};
use super::error::{GrammarError, GrammarResult};
use super::token::Token;

/// A character class of the lexical grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Digit,
    Letter,
    Quote,
    Backslash,
    Hyphen,
    Dot,
    Blank,
    Comma,
    Any,
    Empty,
}

impl Item for Option<char> {
    fn kind(&self) -> &'static str {
        match self {
            Some(_) => "character",
            None => "end of input",
        }
    }

    fn literal(&self) -> String {
        self.map(String::from).unwrap_or_default()
    }
}

impl Class for CharClass {
    type Item = Option<char>;

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "digit" => Self::Digit,
            "letter" => Self::Letter,
            "quote" => Self::Quote,
            "backslash" => Self::Backslash,
            "hyphen" => Self::Hyphen,
            "dot" => Self::Dot,
            "blank" => Self::Blank,
            "comma" => Self::Comma,
            "any" => Self::Any,
            "empty" => Self::Empty,
            _ => return None,
        })
    }

    fn matches(&self, item: &Option<char>) -> bool {
        let Some(c) = *item else {
            return *self == Self::Empty;
        };
        match self {
            Self::Digit => c.is_ascii_digit(),
            Self::Letter => c.is_alphabetic(),
            Self::Quote => c == '"',
            Self::Backslash => c == '\\',
            Self::Hyphen => c == '-',
            Self::Dot => c == '.',
            Self::Blank => c.is_whitespace(),
            Self::Comma => c == ',',
            Self::Any => true,
            Self::Empty => false,
        }
    }
}

/// Operations of the lexical grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexAction {
    Push,
    Keyword,
    Text,
    Number,
}

impl Operation for LexAction {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "push" => Self::Push,
            "keyword" => Self::Keyword,
            "text" => Self::Text,
            "number" => Self::Number,
            _ => return None,
        })
    }
}

/// Accumulates characters and holds the token once one is ready.
#[derive(Debug, Default)]
struct TokenSink {
    buffer: String,
    ready: Option<Token>,
    line: usize,
}

impl Operator<LexAction, Option<char>> for TokenSink {
    fn operate(&mut self, action: &LexAction, item: &Option<char>) -> GrammarResult<()> {
        match action {
            LexAction::Push => match item {
                Some(c) => self.buffer.push(*c),
                None => {
                    return Err(GrammarError::UnexpectedToken {
                        action: "push".into(),
                        expected: "character".into(),
                        kind: item.kind().into(),
                        value: String::new(),
                    });
                }
            },
            LexAction::Keyword => {
                self.ready = Some(Token::Keyword(std::mem::take(&mut self.buffer)));
            }
            LexAction::Text => {
                self.ready = Some(Token::Text(std::mem::take(&mut self.buffer)));
            }
            LexAction::Number => {
                let literal = std::mem::take(&mut self.buffer);
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| GrammarError::MalformedNumber {
                        literal: literal.clone(),
                        line: self.line,
                    })?;
                self.ready = Some(Token::Number(number));
            }
        }
        Ok(())
    }
}

/// Pull-based tokenizer over a source string.
pub struct Lexer<'s> {
    chars: Peekable<Chars<'s>>,
    automaton: Automaton<CharClass, LexAction>,
    sink: TokenSink,
    line: usize,
    token_line: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(grammar: Arc<Grammar<CharClass, LexAction>>, source: &'s str) -> Self {
        Self {
            chars: source.chars().peekable(),
            automaton: Automaton::new(grammar),
            sink: TokenSink::default(),
            line: 1,
            token_line: 1,
        }
    }

    /// The line on which the most recently produced token started.
    pub fn token_line(&self) -> usize {
        self.token_line
    }

    /// Produce the next token. Once the input is exhausted every call
    /// returns [`Token::End`].
    pub fn next_token(&mut self) -> GrammarResult<Token> {
        loop {
            if self.automaton.is_accepted() {
                return Ok(Token::End);
            }

            let item = self.chars.peek().copied();
            if self.sink.buffer.is_empty() && item.is_some_and(|c| !c.is_whitespace()) {
                self.token_line = self.line;
            }
            self.sink.line = self.line;
            let transit = self.automaton.step(&item, self.line, &mut self.sink)?;
            if transit.consumed && self.chars.next() == Some('\n') {
                self.line += 1;
            }

            if let Some(token) = self.sink.ready.take() {
                tracing::trace!(%token, line = self.token_line, "token");
                return Ok(token);
            }
        }
    }

    /// Collect every token up to, but not including, [`Token::End`].
    pub fn tokenize(mut self) -> GrammarResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token()? {
                Token::End => return Ok(tokens),
                token => tokens.push(token),
            }
        }
    }
}
