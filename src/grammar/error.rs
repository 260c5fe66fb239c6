//! Rich diagnostic error types for the grammar subsystem.
//!
//! Follows the fribe miette pattern: every error variant carries
//! `#[diagnostic(code(...), help(...))]` so the user knows exactly
//! what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::error::ModelError;

/// Errors produced while loading grammars or compiling DSL text.
#[derive(Debug, Error, Diagnostic)]
pub enum GrammarError {
    #[error("invalid grammar \"{grammar}\": {message}")]
    #[diagnostic(
        code(fribe::grammar::invalid),
        help(
            "A grammar description is TOML with a [grammar] table naming the start \
             state and a [states.<name>] table per state listing its transitions. \
             Every class, action and next state must be known."
        )
    )]
    InvalidGrammar { grammar: String, message: String },

    #[error("grammar \"{grammar}\" names unknown operation \"{name}\"")]
    #[diagnostic(
        code(fribe::grammar::unknown_operation),
        help(
            "The grammar and the model builder are out of sync. Use only the \
             operations the builder implements, e.g. create_universe, set_center, add_rule."
        )
    )]
    UnknownOperation { grammar: String, name: String },

    #[error(
        "unexpected {kind} \"{value}\" on line {line} \
         (grammar \"{grammar}\", state \"{state}\")"
    )]
    #[diagnostic(
        code(fribe::grammar::violation),
        help(
            "The input does not follow the grammar at this point. Check for a missing \
             `end`, an unquoted name, or a stray character."
        )
    )]
    GrammarViolation {
        grammar: String,
        state: String,
        kind: String,
        value: String,
        line: usize,
    },

    #[error("malformed number \"{literal}\" on line {line}")]
    #[diagnostic(
        code(fribe::grammar::malformed_number),
        help("Numbers are an optional `-`, digits, and an optional `.` followed by digits.")
    )]
    MalformedNumber { literal: String, line: usize },

    #[error("operation {action} expects a {expected} token, got {kind} \"{value}\"")]
    #[diagnostic(
        code(fribe::grammar::unexpected_token),
        help("The grammar attaches this operation to the wrong token class.")
    )]
    UnexpectedToken {
        action: String,
        expected: String,
        kind: String,
        value: String,
    },

    #[error("operation {action} expects a {expected} in progress, found {found}")]
    #[diagnostic(
        code(fribe::grammar::context_mismatch),
        help("The grammar runs the builder's operations in an order it cannot follow.")
    )]
    ContextMismatch {
        action: String,
        expected: String,
        found: String,
    },

    #[error("incomplete {what} at {kind} \"{value}\"")]
    #[diagnostic(
        code(fribe::grammar::incomplete),
        help("The grammar finished or closed an entity before all of its fields were set.")
    )]
    Incomplete {
        what: String,
        kind: String,
        value: String,
    },

    #[error("grammar \"{grammar}\" loops in state \"{state}\" without consuming input")]
    #[diagnostic(
        code(fribe::grammar::stalled),
        help("Some chain of `consume = false` transitions never reaches a consuming one.")
    )]
    Stalled { grammar: String, state: String },

    #[error("{source} (at {kind} \"{value}\")")]
    #[diagnostic(
        code(fribe::grammar::model),
        help("The definition is well-formed but conflicts with the model built so far.")
    )]
    Model {
        kind: String,
        value: String,
        #[source]
        source: ModelError,
    },
}

/// Result type for grammar operations.
pub type GrammarResult<T> = std::result::Result<T, GrammarError>;
