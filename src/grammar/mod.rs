//! Grammar-driven compiler front end for the behavior description language.
//!
//! Both the lexer and the parser are the same table-driven [`Automaton`]
//! running a different grammar description:
//!
//! ```text
//! source ──→ Lexer ──→ Token ──→ Parser ──→ ModelBuilder ──→ Engine
//!              ↑                   ↑
//!        lexical grammar     syntax grammar
//!      (CharClass, LexAction)  (TokenClass, SemanticAction)
//! ```
//!
//! Grammar descriptions are TOML documents. The built-in ones live under
//! `grammars/` and are compiled into the binary; alternatives can be loaded
//! at runtime as long as they only name the classes and operations defined
//! here.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fribe::config::EngineConfig;
//! use fribe::grammar::{Grammar, Lexer, Parser};
//! use fribe::loader::{LEXER_GRAMMAR, PARSER_GRAMMAR};
//!
//! let lexical = Arc::new(Grammar::from_toml(LEXER_GRAMMAR).unwrap());
//! let syntax = Arc::new(Grammar::from_toml(PARSER_GRAMMAR).unwrap());
//! let source = r#"universe "x" "low" 0 0 "high" 1 1 end"#;
//! let engine = Parser::new(syntax, Lexer::new(lexical, source), EngineConfig::default())
//!     .parse()
//!     .unwrap();
//! assert_eq!(engine.universe_names(), ["x"]);
//! ```

pub mod action;
pub mod automaton;
pub mod context;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use action::SemanticAction;
pub use automaton::{Automaton, Grammar};
pub use context::ModelBuilder;
pub use error::{GrammarError, GrammarResult};
pub use lexer::{CharClass, LexAction, Lexer};
pub use parser::{Parser, TokenClass};
pub use token::Token;
