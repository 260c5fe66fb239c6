//! Compilation entry points: DSL text → populated [`Engine`].

use std::path::Path;
use std::sync::Arc;

use crate::config::{EngineConfig, FribeConfig, GrammarPaths, read_file};
use crate::engine::Engine;
use crate::error::FribeResult;
use crate::grammar::{
    CharClass, Grammar, GrammarResult, LexAction, Lexer, Parser, SemanticAction, TokenClass,
};

/// Built-in lexical grammar description.
pub const LEXER_GRAMMAR: &str = include_str!("../grammars/lexer.toml");

/// Built-in syntax grammar description.
pub const PARSER_GRAMMAR: &str = include_str!("../grammars/parser.toml");

/// The pair of grammars a compilation runs with.
#[derive(Debug, Clone)]
pub struct Grammars {
    pub lexical: Arc<Grammar<CharClass, LexAction>>,
    pub syntax: Arc<Grammar<TokenClass, SemanticAction>>,
}

impl Grammars {
    pub fn builtin() -> GrammarResult<Self> {
        Self::from_toml(LEXER_GRAMMAR, PARSER_GRAMMAR)
    }

    pub fn from_toml(lexical: &str, syntax: &str) -> GrammarResult<Self> {
        Ok(Self {
            lexical: Arc::new(Grammar::from_toml(lexical)?),
            syntax: Arc::new(Grammar::from_toml(syntax)?),
        })
    }

    /// Load the grammars named in `paths`, using the built-in description for
    /// any that is not given.
    pub fn load(paths: &GrammarPaths) -> FribeResult<Self> {
        let lexical = match &paths.lexer {
            Some(path) => read_file(path)?,
            None => LEXER_GRAMMAR.to_string(),
        };
        let syntax = match &paths.parser {
            Some(path) => read_file(path)?,
            None => PARSER_GRAMMAR.to_string(),
        };
        Ok(Self::from_toml(&lexical, &syntax)?)
    }
}

/// Compile `source` into a fully populated engine. Any error aborts the
/// compilation; no partial engine is returned.
pub fn compile(source: &str, grammars: &Grammars, config: EngineConfig) -> FribeResult<Engine> {
    let lexer = Lexer::new(Arc::clone(&grammars.lexical), source);
    let engine = Parser::new(Arc::clone(&grammars.syntax), lexer, config).parse()?;
    tracing::info!(
        universes = engine.universe_names().len(),
        rulebases = engine.rulebase_names().len(),
        "model compiled"
    );
    Ok(engine)
}

/// Compile `source` with the built-in grammars and the default configuration.
pub fn load_engine_from_str(source: &str) -> FribeResult<Engine> {
    compile(source, &Grammars::builtin()?, EngineConfig::default())
}

/// Read and compile a model file with the grammars and engine settings of
/// `config`.
pub fn load_engine_from_file(path: &Path, config: &FribeConfig) -> FribeResult<Engine> {
    let source = read_file(path)?;
    let grammars = Grammars::load(&config.grammars)?;
    tracing::debug!(path = %path.display(), "compiling model file");
    compile(&source, &grammars, config.engine.clone())
}
