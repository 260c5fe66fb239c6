//! Parser: tokens → [`Engine`], driven by a syntax grammar.
//!
//! The parser pulls tokens from a [`Lexer`] one at a time and keeps a single
//! token of lookahead: a transition that does not consume its token leaves it
//! for the next step.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::Engine;

use super::action::SemanticAction;
use super::automaton::{Automaton, Class, Grammar};
use super::context::ModelBuilder;
use super::error::GrammarResult;
use super::lexer::Lexer;
use super::token::Token;

/// A token class of the syntax grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    /// A keyword token with exactly this spelling.
    Keyword(String),
    Text,
    Number,
    /// End of input.
    Empty,
}

impl Class for TokenClass {
    type Item = Token;

    /// `text`, `number` and `empty` name token types; any other lowercase
    /// word names the keyword spelled that way.
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "empty" => Some(Self::Empty),
            word if !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase()) => {
                Some(Self::Keyword(word.to_string()))
            }
            _ => None,
        }
    }

    fn matches(&self, token: &Token) -> bool {
        match (self, token) {
            (Self::Keyword(expected), Token::Keyword(found)) => expected == found,
            (Self::Text, Token::Text(_))
            | (Self::Number, Token::Number(_))
            | (Self::Empty, Token::End) => true,
            _ => false,
        }
    }
}

pub struct Parser<'s> {
    lexer: Lexer<'s>,
    automaton: Automaton<TokenClass, SemanticAction>,
    builder: ModelBuilder,
    lookahead: Option<Token>,
}

impl<'s> Parser<'s> {
    pub fn new(
        grammar: Arc<Grammar<TokenClass, SemanticAction>>,
        lexer: Lexer<'s>,
        config: EngineConfig,
    ) -> Self {
        Self {
            lexer,
            automaton: Automaton::new(grammar),
            builder: ModelBuilder::new(config),
            lookahead: None,
        }
    }

    /// Run the syntax grammar to acceptance and return the built engine.
    pub fn parse(mut self) -> GrammarResult<Engine> {
        loop {
            let token = match self.lookahead.take() {
                Some(token) => token,
                None => self.lexer.next_token()?,
            };
            let line = self.lexer.token_line();
            tracing::trace!(state = self.automaton.state_name(), %token, line, "parser step");
            let transit = self.automaton.step(&token, line, &mut self.builder)?;
            if transit.accepted {
                return self.builder.finish(&token);
            }
            if !transit.consumed {
                self.lookahead = Some(token);
            }
        }
    }
}
