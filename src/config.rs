//! Configuration for the engine and the compiler.
//!
//! [`EngineConfig`] is the in-process knob set. [`FribeConfig`] is its TOML
//! file form, which may also point at grammar descriptions that replace the
//! built-in ones:
//!
//! ```toml
//! [engine]
//! strict_monotonic = true
//!
//! [grammars]
//! lexer = "grammars/lexer.toml"
//! parser = "grammars/parser.toml"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration for the fribe engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Reject universes whose term values are not monotonic in center
    /// order (default: false).
    pub strict_monotonic: bool,
}

/// Paths to caller-supplied grammar descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrammarPaths {
    pub lexer: Option<PathBuf>,
    pub parser: Option<PathBuf>,
}

/// The `fribe.toml` configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FribeConfig {
    pub engine: EngineConfig,
    pub grammars: GrammarPaths,
}

impl FribeConfig {
    /// Parse a configuration from a TOML string. `origin` names the source in
    /// error messages.
    pub fn from_toml_str(toml_str: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.message().to_string(),
        })
    }

    /// Load a configuration file. Relative grammar paths are resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = read_file(path)?;
        let mut config = Self::from_toml_str(&text, &path.display().to_string())?;
        if let Some(dir) = path.parent() {
            for grammar in [&mut config.grammars.lexer, &mut config.grammars.parser]
                .into_iter()
                .flatten()
            {
                if grammar.is_relative() {
                    *grammar = dir.join(&*grammar);
                }
            }
        }
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
