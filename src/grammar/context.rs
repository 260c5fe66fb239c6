//! Model builder: applies semantic actions to a stack of in-progress entities.
//!
//! The grammar nests at most three levels (block → item → predicate), so the
//! builder keeps one frame per level. `create_*` pushes a frame under the
//! parent it belongs to, `set_*` edits the top frame, and `add_*` pops the
//! top frame into its parent (or into the engine for blocks).

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::ModelError;
use crate::model::{Rule, RuleBase, Term, Universe};

use super::action::SemanticAction;
use super::automaton::Operator;
use super::error::{GrammarError, GrammarResult};
use super::token::Token;

/// Deepest nesting the grammar can produce.
pub const MAX_DEPTH: usize = 3;

#[derive(Debug, Default)]
struct TermDraft {
    name: String,
    center: Option<f64>,
    value: Option<f64>,
}

#[derive(Debug, Default)]
struct PredicateDraft {
    antecedent: Option<String>,
    term: Option<String>,
}

#[derive(Debug)]
enum Frame {
    Universe(Universe),
    Term(TermDraft),
    RuleBase(RuleBase),
    Rule(Rule),
    Predicate(PredicateDraft),
}

impl Frame {
    fn kind(&self) -> &'static str {
        match self {
            Self::Universe(_) => "universe",
            Self::Term(_) => "term",
            Self::RuleBase(_) => "rulebase",
            Self::Rule(_) => "rule",
            Self::Predicate(_) => "predicate",
        }
    }
}

/// Typed access to the top frame: `$get` borrows it, `$take` pops it.
macro_rules! frame_accessors {
    ($($variant:ident => $ty:ty, $kind:literal, $get:ident, $take:ident;)*) => {
        $(
            fn $get(&mut self, action: SemanticAction) -> GrammarResult<&mut $ty> {
                match self.stack.last_mut() {
                    Some(Frame::$variant(inner)) => Ok(inner),
                    other => Err(mismatch(action, $kind, other.map(|f| f.kind()))),
                }
            }

            fn $take(&mut self, action: SemanticAction) -> GrammarResult<$ty> {
                match self.stack.pop() {
                    Some(Frame::$variant(inner)) => Ok(inner),
                    other => Err(mismatch(action, $kind, other.as_ref().map(Frame::kind))),
                }
            }
        )*
    };
}

/// Builds an [`Engine`] from the parser's semantic actions.
#[derive(Debug)]
pub struct ModelBuilder {
    engine: Engine,
    stack: Vec<Frame>,
}

impl ModelBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: Engine::new(config),
            stack: Vec::with_capacity(MAX_DEPTH),
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Hand over the engine once every entity has been closed.
    pub fn finish(self, token: &Token) -> GrammarResult<Engine> {
        if let Some(frame) = self.stack.last() {
            return Err(GrammarError::Incomplete {
                what: frame.kind().into(),
                kind: token.kind().into(),
                value: token.literal(),
            });
        }
        Ok(self.engine)
    }

    fn apply(&mut self, action: SemanticAction, token: &Token) -> GrammarResult<()> {
        use SemanticAction as A;

        match action {
            A::CreateUniverse => self.open(action, None, Frame::Universe(Universe::default())),
            A::SetUniverseName => {
                let name = text(action, token)?;
                self.universe_mut(action)?.set_name(name);
                Ok(())
            }
            A::SetUniverseDescription => {
                let description = text(action, token)?;
                self.universe_mut(action)?.set_description(description);
                Ok(())
            }
            A::CreateTerm => {
                let draft = TermDraft {
                    name: text(action, token)?.to_string(),
                    ..Default::default()
                };
                self.open(action, Some("universe"), Frame::Term(draft))
            }
            A::SetCenter => {
                let center = number(action, token)?;
                self.term_mut(action)?.center = Some(center);
                Ok(())
            }
            A::SetValue => {
                let value = number(action, token)?;
                self.term_mut(action)?.value = Some(value);
                Ok(())
            }
            A::AddTerm => {
                let draft = self.take_term(action)?;
                let (Some(center), Some(value)) = (draft.center, draft.value) else {
                    return Err(incomplete(&format!("term \"{}\"", draft.name), token));
                };
                let term = Term::new(draft.name, center, value);
                self.universe_mut(action)?
                    .add_term(term)
                    .map_err(|e| model(e, token))
            }
            A::AddUniverse => {
                let universe = self.take_universe(action)?;
                if universe.name().is_empty() {
                    return Err(incomplete("unnamed universe", token));
                }
                self.engine
                    .add_universe(universe)
                    .map_err(|e| model(e, token))
            }
            A::CreateRulebase => self.open(action, None, Frame::RuleBase(RuleBase::default())),
            A::SetRulebaseName => {
                let name = text(action, token)?;
                self.rulebase_mut(action)?.set_name(name);
                Ok(())
            }
            A::SetRulebaseDescription => {
                let description = text(action, token)?;
                self.rulebase_mut(action)?.set_description(description);
                Ok(())
            }
            A::CreateRule => self.open(action, Some("rulebase"), Frame::Rule(Rule::default())),
            A::SetRuleDescription => {
                let description = text(action, token)?;
                self.rule_mut(action)?.set_description(description);
                Ok(())
            }
            A::SetConsequence => {
                let consequent = text(action, token)?;
                self.rule_mut(action)?.set_consequent(consequent);
                Ok(())
            }
            A::CreatePredicate => self.open(
                action,
                Some("rule"),
                Frame::Predicate(PredicateDraft::default()),
            ),
            A::SetPredicateName => {
                let antecedent = text(action, token)?;
                self.predicate_mut(action)?.antecedent = Some(antecedent.to_string());
                Ok(())
            }
            A::SetPredicateValue => {
                let term = text(action, token)?;
                self.predicate_mut(action)?.term = Some(term.to_string());
                Ok(())
            }
            A::AddPredicate => {
                let draft = self.take_predicate(action)?;
                let (Some(antecedent), Some(term)) = (draft.antecedent, draft.term) else {
                    return Err(incomplete("predicate", token));
                };
                self.rule_mut(action)?
                    .add_predicate(antecedent, term)
                    .map_err(|e| model(e, token))
            }
            A::AddRule => {
                let rule = self.take_rule(action)?;
                if rule.consequent().is_empty() {
                    return Err(incomplete("rule without consequent", token));
                }
                self.rulebase_mut(action)?.add_rule(rule);
                Ok(())
            }
            A::AddRulebase => {
                let rulebase = self.take_rulebase(action)?;
                if rulebase.name().is_empty() {
                    return Err(incomplete("unnamed rulebase", token));
                }
                self.engine
                    .add_rulebase(rulebase)
                    .map_err(|e| model(e, token))
            }
        }
    }

    /// Push `frame` on top of a `parent` frame (`None`: at the top level).
    fn open(
        &mut self,
        action: SemanticAction,
        parent: Option<&'static str>,
        frame: Frame,
    ) -> GrammarResult<()> {
        let top = self.stack.last().map(Frame::kind);
        if top != parent {
            return Err(mismatch(action, parent.unwrap_or("top level"), top));
        }
        self.stack.push(frame);
        Ok(())
    }

    frame_accessors! {
        Universe => Universe, "universe", universe_mut, take_universe;
        Term => TermDraft, "term", term_mut, take_term;
        RuleBase => RuleBase, "rulebase", rulebase_mut, take_rulebase;
        Rule => Rule, "rule", rule_mut, take_rule;
        Predicate => PredicateDraft, "predicate", predicate_mut, take_predicate;
    }
}

impl Operator<SemanticAction, Token> for ModelBuilder {
    fn operate(&mut self, action: &SemanticAction, token: &Token) -> GrammarResult<()> {
        tracing::trace!(%action, %token, depth = self.depth(), "semantic action");
        self.apply(*action, token)
    }
}

fn text(action: SemanticAction, token: &Token) -> GrammarResult<&str> {
    match token {
        Token::Text(s) => Ok(s),
        other => Err(unexpected(action, "text", other)),
    }
}

fn number(action: SemanticAction, token: &Token) -> GrammarResult<f64> {
    match token {
        Token::Number(n) => Ok(*n),
        other => Err(unexpected(action, "number", other)),
    }
}

fn unexpected(action: SemanticAction, expected: &str, token: &Token) -> GrammarError {
    GrammarError::UnexpectedToken {
        action: action.to_string(),
        expected: expected.into(),
        kind: token.kind().into(),
        value: token.literal(),
    }
}

fn mismatch(action: SemanticAction, expected: &str, found: Option<&str>) -> GrammarError {
    GrammarError::ContextMismatch {
        action: action.to_string(),
        expected: expected.into(),
        found: found.unwrap_or("nothing").into(),
    }
}

fn incomplete(what: &str, token: &Token) -> GrammarError {
    GrammarError::Incomplete {
        what: what.into(),
        kind: token.kind().into(),
        value: token.literal(),
    }
}

fn model(source: ModelError, token: &Token) -> GrammarError {
    GrammarError::Model {
        kind: token.kind().into(),
        value: token.literal(),
        source,
    }
}
