//! Semantic actions of the syntax grammar.
//!
//! The set is closed: a grammar naming anything else is rejected when it is
//! loaded, so the builder never meets an operation it does not implement.

use std::fmt;

use super::automaton::Operation;

/// An operation the model builder performs when the parser takes a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticAction {
    CreateUniverse,
    SetUniverseName,
    SetUniverseDescription,
    CreateTerm,
    SetCenter,
    SetValue,
    AddTerm,
    AddUniverse,
    CreateRulebase,
    SetRulebaseName,
    SetRulebaseDescription,
    CreateRule,
    SetRuleDescription,
    CreatePredicate,
    SetPredicateName,
    SetPredicateValue,
    AddPredicate,
    SetConsequence,
    AddRule,
    AddRulebase,
}

impl SemanticAction {
    pub const ALL: [SemanticAction; 20] = [
        Self::CreateUniverse,
        Self::SetUniverseName,
        Self::SetUniverseDescription,
        Self::CreateTerm,
        Self::SetCenter,
        Self::SetValue,
        Self::AddTerm,
        Self::AddUniverse,
        Self::CreateRulebase,
        Self::SetRulebaseName,
        Self::SetRulebaseDescription,
        Self::CreateRule,
        Self::SetRuleDescription,
        Self::CreatePredicate,
        Self::SetPredicateName,
        Self::SetPredicateValue,
        Self::AddPredicate,
        Self::SetConsequence,
        Self::AddRule,
        Self::AddRulebase,
    ];

    /// The name grammars use for this action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateUniverse => "create_universe",
            Self::SetUniverseName => "set_universe_name",
            Self::SetUniverseDescription => "set_universe_description",
            Self::CreateTerm => "create_term",
            Self::SetCenter => "set_center",
            Self::SetValue => "set_value",
            Self::AddTerm => "add_term",
            Self::AddUniverse => "add_universe",
            Self::CreateRulebase => "create_rulebase",
            Self::SetRulebaseName => "set_rulebase_name",
            Self::SetRulebaseDescription => "set_rulebase_description",
            Self::CreateRule => "create_rule",
            Self::SetRuleDescription => "set_rule_description",
            Self::CreatePredicate => "create_predicate",
            Self::SetPredicateName => "set_predicate_name",
            Self::SetPredicateValue => "set_predicate_value",
            Self::AddPredicate => "add_predicate",
            Self::SetConsequence => "set_consequence",
            Self::AddRule => "add_rule",
            Self::AddRulebase => "add_rulebase",
        }
    }
}

impl Operation for SemanticAction {
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

impl fmt::Display for SemanticAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for action in SemanticAction::ALL {
            assert_eq!(SemanticAction::from_name(action.name()), Some(action));
        }
    }

    #[test]
    fn unknown_names_are_not_actions() {
        assert_eq!(SemanticAction::from_name("delete_universe"), None);
        assert_eq!(SemanticAction::from_name("CreateUniverse"), None);
    }
}
