//! Rules: predicate sets with a consequent symbol.

use std::collections::BTreeMap;

use crate::error::{Entity, ModelError, ModelResult};

/// A single weighted rule.
///
/// Each predicate binds an antecedent universe to the term it is expected to
/// match. The consequent names a term of the owning rulebase's universe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    description: Option<String>,
    predicates: BTreeMap<String, String>,
    consequent: String,
}

impl Rule {
    pub fn new(consequent: impl Into<String>) -> Self {
        Self {
            description: None,
            predicates: BTreeMap::new(),
            consequent: consequent.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style [`add_predicate`](Self::add_predicate).
    pub fn when(mut self, antecedent: &str, term: &str) -> ModelResult<Self> {
        self.add_predicate(antecedent, term)?;
        Ok(self)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn consequent(&self) -> &str {
        &self.consequent
    }

    /// Antecedent universe name → expected term name, in antecedent order.
    pub fn predicates(&self) -> &BTreeMap<String, String> {
        &self.predicates
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub(crate) fn set_consequent(&mut self, consequent: impl Into<String>) {
        self.consequent = consequent.into();
    }

    pub fn add_predicate(
        &mut self,
        antecedent: impl Into<String>,
        term: impl Into<String>,
    ) -> ModelResult<()> {
        let antecedent = antecedent.into();
        if self.predicates.contains_key(&antecedent) {
            return Err(ModelError::DuplicateDefinition {
                entity: Entity::Predicate,
                name: antecedent,
                scope: format!("rule \"{}\"", self.consequent),
            });
        }
        self.predicates.insert(antecedent, term.into());
        Ok(())
    }

    /// Aggregate per-predicate distances into the rule's distance.
    ///
    /// The result is the mean of the squared distances. No normalization by
    /// the domain diagonal is applied, so wide universes dominate narrow ones.
    pub fn calc_distance(distances: &[f64]) -> Option<f64> {
        if distances.is_empty() {
            return None;
        }
        let sum: f64 = distances.iter().map(|d| d * d).sum();
        Some(sum / distances.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_antecedent_is_rejected() {
        let mut rule = Rule::new("high");
        rule.add_predicate("x", "high").unwrap();
        let err = rule.add_predicate("x", "low").unwrap_err();
        assert!(matches!(
            err,
            ModelError::DuplicateDefinition {
                entity: Entity::Predicate,
                ..
            }
        ));
        assert_eq!(rule.predicates()["x"], "high");
    }

    #[test]
    fn predicates_iterate_in_antecedent_order() {
        let rule = Rule::new("z")
            .when("y", "low")
            .and_then(|r| r.when("x", "high"))
            .unwrap();
        let names: Vec<_> = rule.predicates().keys().map(String::as_str).collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn distance_is_mean_of_squares() {
        assert_eq!(Rule::calc_distance(&[1.0, 0.0]), Some(0.5));
        assert_eq!(Rule::calc_distance(&[0.5, 0.5]), Some(0.25));
        assert_eq!(Rule::calc_distance(&[-2.0]), Some(4.0));
        assert_eq!(Rule::calc_distance(&[]), None);
    }
}
