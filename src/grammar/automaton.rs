//! Table-driven automaton executing grammar descriptions.
//!
//! A grammar description is a TOML document listing states and their ordered
//! transitions. The automaton knows nothing about characters, tokens or the
//! model: it asks a [`Class`] whether the current item belongs to it, and
//! hands the named actions to an [`Operator`]. The lexer and the parser are
//! both operators of their own automaton.
//!
//! ```toml
//! [grammar]
//! name = "example"
//! start = "start"
//!
//! [states.start]
//! transitions = [
//!     { class = "letter", actions = ["push"], next = "start" },
//!     { class = "empty", next = "accept", consume = false },
//! ]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Deserialize;

use super::error::{GrammarError, GrammarResult};

/// Reserved next-state name that halts the automaton successfully.
pub const ACCEPT: &str = "accept";

/// An item the automaton steps over, described in error messages.
pub trait Item {
    fn kind(&self) -> &'static str;
    fn literal(&self) -> String;
}

/// An item class a grammar may name in a transition.
pub trait Class: Sized {
    type Item: Item;

    fn from_name(name: &str) -> Option<Self>;
    fn matches(&self, item: &Self::Item) -> bool;
}

/// The closed set of operations a grammar may name.
pub trait Operation: Sized {
    fn from_name(name: &str) -> Option<Self>;
}

/// Receives the operations of each transition taken.
pub trait Operator<A, I> {
    fn operate(&mut self, action: &A, item: &I) -> GrammarResult<()>;
}

// ---------------------------------------------------------------------------
// Description (serde form)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Description {
    grammar: Header,
    states: BTreeMap<String, StateDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Header {
    name: String,
    start: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StateDescription {
    transitions: Vec<TransitionDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TransitionDescription {
    class: String,
    #[serde(default)]
    actions: Vec<String>,
    next: String,
    #[serde(default = "consume_by_default")]
    consume: bool,
}

fn consume_by_default() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Resolved grammar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    State(usize),
    Accept,
}

#[derive(Debug)]
struct Transition<C, A> {
    class: C,
    actions: Vec<A>,
    next: Next,
    consume: bool,
}

#[derive(Debug)]
struct State<C, A> {
    name: String,
    transitions: Vec<Transition<C, A>>,
}

/// A loaded grammar with every class, action and state name resolved.
#[derive(Debug)]
pub struct Grammar<C, A> {
    name: String,
    start: usize,
    states: Vec<State<C, A>>,
}

impl<C: Class, A: Operation> Grammar<C, A> {
    /// Load and resolve a grammar description.
    pub fn from_toml(toml_str: &str) -> GrammarResult<Self> {
        let description: Description =
            toml::from_str(toml_str).map_err(|e| GrammarError::InvalidGrammar {
                grammar: "<unparsed>".into(),
                message: e.message().to_string(),
            })?;
        Self::resolve(description)
    }

    fn resolve(description: Description) -> GrammarResult<Self> {
        let name = description.grammar.name;
        let invalid = |message: String| GrammarError::InvalidGrammar {
            grammar: name.clone(),
            message,
        };

        let index: HashMap<&str, usize> = description
            .states
            .keys()
            .enumerate()
            .map(|(i, state)| (state.as_str(), i))
            .collect();
        if index.contains_key(ACCEPT) {
            return Err(invalid(format!("\"{ACCEPT}\" is reserved and cannot name a state")));
        }
        let start = *index
            .get(description.grammar.start.as_str())
            .ok_or_else(|| {
                invalid(format!(
                    "start state \"{}\" is not defined",
                    description.grammar.start
                ))
            })?;

        let mut states = Vec::with_capacity(description.states.len());
        for (state_name, state) in &description.states {
            let mut transitions = Vec::with_capacity(state.transitions.len());
            for t in &state.transitions {
                let class = C::from_name(&t.class).ok_or_else(|| {
                    invalid(format!("state \"{state_name}\" uses unknown class \"{}\"", t.class))
                })?;
                let actions = t
                    .actions
                    .iter()
                    .map(|action| {
                        A::from_name(action).ok_or_else(|| GrammarError::UnknownOperation {
                            grammar: name.clone(),
                            name: action.clone(),
                        })
                    })
                    .collect::<GrammarResult<Vec<_>>>()?;
                let next = if t.next == ACCEPT {
                    Next::Accept
                } else {
                    Next::State(*index.get(t.next.as_str()).ok_or_else(|| {
                        invalid(format!(
                            "state \"{state_name}\" moves to unknown state \"{}\"",
                            t.next
                        ))
                    })?)
                };
                transitions.push(Transition {
                    class,
                    actions,
                    next,
                    consume: t.consume,
                });
            }
            states.push(State {
                name: state_name.clone(),
                transitions,
            });
        }

        tracing::debug!(grammar = %name, states = states.len(), "grammar loaded");
        Ok(Self {
            name,
            start,
            states,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

// ---------------------------------------------------------------------------
// Automaton
// ---------------------------------------------------------------------------

/// Outcome of one automaton step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transit {
    /// The item was consumed and the caller should advance its source.
    pub consumed: bool,
    /// The automaton reached the accepting state.
    pub accepted: bool,
}

/// A running instance of a [`Grammar`].
#[derive(Debug)]
pub struct Automaton<C, A> {
    grammar: Arc<Grammar<C, A>>,
    state: usize,
    accepted: bool,
    idle_steps: usize,
}

impl<C: Class, A: Operation> Automaton<C, A> {
    pub fn new(grammar: Arc<Grammar<C, A>>) -> Self {
        let state = grammar.start;
        Self {
            grammar,
            state,
            accepted: false,
            idle_steps: 0,
        }
    }

    pub fn state_name(&self) -> &str {
        &self.grammar.states[self.state].name
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Classify `item` in the current state, run the first matching
    /// transition's actions on `operator`, and move on. `line` is reported in
    /// violation errors.
    pub fn step<O>(
        &mut self,
        item: &C::Item,
        line: usize,
        operator: &mut O,
    ) -> GrammarResult<Transit>
    where
        O: Operator<A, C::Item>,
    {
        if self.accepted {
            return Ok(Transit {
                consumed: false,
                accepted: true,
            });
        }

        let state = &self.grammar.states[self.state];
        let transition = state
            .transitions
            .iter()
            .find(|t| t.class.matches(item))
            .ok_or_else(|| GrammarError::GrammarViolation {
                grammar: self.grammar.name.clone(),
                state: state.name.clone(),
                kind: item.kind().to_string(),
                value: item.literal(),
                line,
            })?;

        for action in &transition.actions {
            operator.operate(action, item)?;
        }

        if transition.consume {
            self.idle_steps = 0;
        } else {
            self.idle_steps += 1;
            if self.idle_steps > self.grammar.states.len() {
                return Err(GrammarError::Stalled {
                    grammar: self.grammar.name.clone(),
                    state: state.name.clone(),
                });
            }
        }

        match transition.next {
            Next::State(next) => self.state = next,
            Next::Accept => self.accepted = true,
        }

        Ok(Transit {
            consumed: transition.consume,
            accepted: self.accepted,
        })
    }
}
