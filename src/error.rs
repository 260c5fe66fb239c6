//! Rich diagnostic error types for the fribe engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::grammar::GrammarError;

/// Top-level error type for the fribe engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum FribeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// The kind of model entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Universe,
    Term,
    RuleBase,
    Predicate,
    Signal,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universe => write!(f, "universe"),
            Self::Term => write!(f, "term"),
            Self::RuleBase => write!(f, "rulebase"),
            Self::Predicate => write!(f, "predicate"),
            Self::Signal => write!(f, "signal"),
        }
    }
}

// ---------------------------------------------------------------------------
// Model errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    #[error("duplicate {entity} \"{name}\" in {scope}")]
    #[diagnostic(
        code(fribe::model::duplicate),
        help(
            "Names must be unique within their scope: terms within a universe, \
             antecedents within a rule, universes and rulebases within an engine. \
             Rename or remove the second definition."
        )
    )]
    DuplicateDefinition {
        entity: Entity,
        name: String,
        scope: String,
    },

    #[error("undefined {entity} \"{name}\" referenced from {scope}")]
    #[diagnostic(
        code(fribe::model::undefined),
        help(
            "Every antecedent must name a defined universe and a term of it, every \
             consequent must name a term of the rulebase's own universe, and every \
             antecedent must be present in the observation or the engine state."
        )
    )]
    UndefinedReference {
        entity: Entity,
        name: String,
        scope: String,
    },

    #[error("value {value} is outside the domain [{min}, {max}] of universe \"{universe}\"")]
    #[diagnostic(
        code(fribe::model::out_of_domain),
        help(
            "Observations must lie between the smallest and the largest term center. \
             Clamp the input or add terms that cover the observed range."
        )
    )]
    OutOfDomain {
        universe: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error(
        "terms of universe \"{universe}\" share center {center} \
         but map it to {first} and {second}"
    )]
    #[diagnostic(
        code(fribe::model::degenerate),
        help("Terms with the same center must have the same value. Move one of the centers.")
    )]
    DegenerateInterpolation {
        universe: String,
        center: f64,
        first: f64,
        second: f64,
    },

    #[error("cannot aggregate rulebase \"{rulebase}\": {reason}")]
    #[diagnostic(
        code(fribe::model::empty_aggregation),
        help("A rulebase needs at least one rule, and each rule at least one predicate.")
    )]
    EmptyAggregation { rulebase: String, reason: String },

    #[error("universe \"{universe}\" has no terms")]
    #[diagnostic(
        code(fribe::model::empty_universe),
        help("Add at least one \"<term>\" <center> <value> line to the universe.")
    )]
    EmptyUniverse { universe: String },

    #[error("universe \"{universe}\" is not monotonic at term \"{term}\"")]
    #[diagnostic(
        code(fribe::model::non_monotonic),
        help(
            "With strict_monotonic enabled, term values must consistently rise or \
             fall as centers increase. Reorder the values or disable the check."
        )
    )]
    NonMonotonic { universe: String, term: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    #[diagnostic(
        code(fribe::config::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {message}")]
    #[diagnostic(
        code(fribe::config::parse),
        help("The configuration is TOML with optional [engine] and [grammars] tables.")
    )]
    Parse { path: String, message: String },
}

/// Result type for model operations.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Convenience alias for functions returning fribe results.
pub type FribeResult<T> = std::result::Result<T, FribeError>;
