//! The behavior model: universes, terms, rules, and rulebases.
//!
//! Model objects are built once (by the DSL compiler or programmatically)
//! and treated as read-only configuration once an [`Engine`](crate::engine::Engine)
//! owns them.

pub mod rule;
pub mod rulebase;
pub mod term;
pub mod universe;

pub use rule::Rule;
pub use rulebase::RuleBase;
pub use term::Term;
pub use universe::Universe;
