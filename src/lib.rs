// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # fribe
//!
//! A fuzzy rule-based inference engine driven by a small behavior description
//! language.
//!
//! ## Architecture
//!
//! - **Model** (`model`): universes of named terms mapping centers to values,
//!   rules and rulebases with inverse-square distance aggregation
//! - **Engine** (`engine`): owns the model and the committed state, runs
//!   atomic evaluation cycles
//! - **Snapshot** (`snapshot`): copy-on-write view of the committed state
//! - **Grammar** (`grammar`): table-driven lexer and parser built from TOML
//!   grammar descriptions
//! - **Loader** (`loader`): DSL text or files → compiled engine
//!
//! ## Library usage
//!
//! ```no_run
//! use std::collections::HashMap;
//! use fribe::loader::load_engine_from_str;
//!
//! let mut engine = load_engine_from_str(r#"
//!     universe "x" "low" 0 0 "high" 1 1 end
//!     universe "z" "low" 0 0 "high" 1 1 end
//!     rulebase "z"
//!         rule "high" when "x" is "high" end
//!         rule "low" when "x" is "low" end
//!     end
//! "#).unwrap();
//!
//! let observations = HashMap::from([("x".to_string(), 0.75)]);
//! engine.calc_consequences(&observations).unwrap();
//! println!("z = {}", engine.get_state("z").unwrap());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod loader;
pub mod model;
pub mod snapshot;
