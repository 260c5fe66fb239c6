//! Rulebases and distance-weighted consequence aggregation.
//!
//! Each rule is scored by how far the observation lies from the rule's
//! expected terms. A rule that matches exactly (distance `0.0`) wins outright;
//! otherwise every rule contributes its consequent value weighted by the
//! inverse square of its distance.

use std::collections::BTreeMap;

use crate::error::{Entity, ModelError, ModelResult};

use super::rule::Rule;
use super::universe::Universe;

/// A named rule collection evaluating to one scalar consequence.
///
/// The rulebase's name doubles as the name of the universe whose terms the
/// rule consequents refer to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBase {
    name: String,
    description: Option<String>,
    rules: Vec<Rule>,
}

impl RuleBase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            rules: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Distances between the observation and each predicate of `rule`.
    pub fn calc_predicate_distances(
        &self,
        universes: &BTreeMap<String, Universe>,
        observation: &BTreeMap<String, f64>,
        rule: &Rule,
    ) -> ModelResult<Vec<f64>> {
        let scope = format!("rule \"{}\" of rulebase \"{}\"", rule.consequent(), self.name);
        rule.predicates()
            .iter()
            .map(|(antecedent, expected)| {
                let universe =
                    universes
                        .get(antecedent)
                        .ok_or_else(|| ModelError::UndefinedReference {
                            entity: Entity::Universe,
                            name: antecedent.clone(),
                            scope: scope.clone(),
                        })?;
                let observed =
                    observation
                        .get(antecedent)
                        .ok_or_else(|| ModelError::UndefinedReference {
                            entity: Entity::Signal,
                            name: antecedent.clone(),
                            scope: format!("{scope} (missing antecedent)"),
                        })?;
                let center = universe.resolve_term(expected, &scope)?.center();
                universe.calc_distance(*observed, center)
            })
            .collect()
    }

    /// Scalar distance of every rule, in rule order.
    pub fn calc_rule_distances(
        &self,
        universes: &BTreeMap<String, Universe>,
        observation: &BTreeMap<String, f64>,
    ) -> ModelResult<Vec<f64>> {
        self.rules
            .iter()
            .map(|rule| {
                let distances = self.calc_predicate_distances(universes, observation, rule)?;
                Rule::calc_distance(&distances).ok_or_else(|| ModelError::EmptyAggregation {
                    rulebase: self.name.clone(),
                    reason: format!("rule \"{}\" has no predicates", rule.consequent()),
                })
            })
            .collect()
    }

    /// Rule distances grouped by consequent symbol.
    pub fn calc_distances_by_consequences(
        &self,
        universes: &BTreeMap<String, Universe>,
        observation: &BTreeMap<String, f64>,
    ) -> ModelResult<BTreeMap<String, Vec<f64>>> {
        let distances = self.calc_rule_distances(universes, observation)?;
        let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (rule, distance) in self.rules.iter().zip(distances) {
            grouped
                .entry(rule.consequent().to_string())
                .or_default()
                .push(distance);
        }
        Ok(grouped)
    }

    /// Evaluate the rulebase against an observation.
    pub fn calc_consequence(
        &self,
        universes: &BTreeMap<String, Universe>,
        observation: &BTreeMap<String, f64>,
    ) -> ModelResult<f64> {
        if self.rules.is_empty() {
            return Err(ModelError::EmptyAggregation {
                rulebase: self.name.clone(),
                reason: "no rules to weight".into(),
            });
        }

        let output = universes
            .get(&self.name)
            .ok_or_else(|| ModelError::UndefinedReference {
                entity: Entity::Universe,
                name: self.name.clone(),
                scope: format!("rulebase \"{}\"", self.name),
            })?;

        let grouped = self.calc_distances_by_consequences(universes, observation)?;

        // (consequent value, rule distance) for every rule.
        let mut scored = Vec::with_capacity(self.rules.len());
        for (consequent, distances) in &grouped {
            let scope = format!("consequent of rulebase \"{}\"", self.name);
            let value = output.resolve_term(consequent, &scope)?.value();
            scored.extend(distances.iter().map(|d| (value, *d)));
        }

        let exact: Vec<f64> = scored
            .iter()
            .filter(|(_, d)| *d == 0.0)
            .map(|(v, _)| *v)
            .collect();
        if !exact.is_empty() {
            return Ok(exact.iter().sum::<f64>() / exact.len() as f64);
        }

        // Weights are (d_min / d)^2: proportional to 1 / d^2, with the
        // nearest rule at 1 so tiny distances cannot overflow the total.
        let nearest = scored.iter().map(|(_, d)| *d).fold(f64::INFINITY, f64::min);
        let (weighted, total) = scored.iter().fold((0.0, 0.0), |(sum, total), (v, d)| {
            let ratio = nearest / d;
            let weight = ratio * ratio;
            (sum + v * weight, total + weight)
        });
        if total == 0.0 || !total.is_finite() {
            return Err(ModelError::EmptyAggregation {
                rulebase: self.name.clone(),
                reason: format!("total rule weight is {total}"),
            });
        }

        Ok(weighted / total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;

    fn two_point(name: &str) -> Universe {
        let mut u = Universe::new(name);
        u.add_term(Term::new("low", 0.0, 0.0)).unwrap();
        u.add_term(Term::new("high", 1.0, 1.0)).unwrap();
        u
    }

    fn universes(names: &[&str]) -> BTreeMap<String, Universe> {
        names.iter().map(|n| (n.to_string(), two_point(n))).collect()
    }

    fn observe(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn xyz_rulebase() -> RuleBase {
        RuleBase::new("z")
            .with_rule(
                Rule::new("high")
                    .when("x", "high")
                    .and_then(|r| r.when("y", "high"))
                    .unwrap(),
            )
            .with_rule(Rule::new("low").when("x", "low").unwrap())
            .with_rule(Rule::new("low").when("y", "low").unwrap())
    }

    #[test]
    fn predicate_distances_follow_value_space() {
        let rb = xyz_rulebase();
        let us = universes(&["x", "y", "z"]);
        let obs = observe(&[("x", 0.25), ("y", 1.0)]);
        let d = rb.calc_predicate_distances(&us, &obs, &rb.rules()[0]).unwrap();
        assert_eq!(d, vec![0.75, 0.0]);
    }

    #[test]
    fn distances_are_grouped_by_consequent() {
        let rb = xyz_rulebase();
        let us = universes(&["x", "y", "z"]);
        let obs = observe(&[("x", 0.5), ("y", 0.5)]);
        let grouped = rb.calc_distances_by_consequences(&us, &obs).unwrap();
        assert_eq!(grouped["high"], vec![0.25]);
        assert_eq!(grouped["low"], vec![0.25, 0.25]);
    }

    #[test]
    fn exact_match_ignores_other_rules() {
        let rb = xyz_rulebase();
        let us = universes(&["x", "y", "z"]);
        let z = rb
            .calc_consequence(&us, &observe(&[("x", 1.0), ("y", 1.0)]))
            .unwrap();
        assert_eq!(z, 1.0);
    }

    #[test]
    fn exact_matches_count_with_multiplicity() {
        let rb = RuleBase::new("z")
            .with_rule(Rule::new("high").when("x", "high").unwrap())
            .with_rule(Rule::new("high").when("y", "high").unwrap())
            .with_rule(Rule::new("low").when("y", "high").unwrap());
        let us = universes(&["x", "y", "z"]);
        let z = rb
            .calc_consequence(&us, &observe(&[("x", 1.0), ("y", 1.0)]))
            .unwrap();
        assert!((z - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn inverse_square_weighting() {
        let mut out = Universe::new("z");
        out.add_term(Term::new("a", 0.0, 2.0)).unwrap();
        out.add_term(Term::new("b", 1.0, 10.0)).unwrap();
        let mut us = universes(&["x"]);
        us.insert("z".into(), out);

        let rb = RuleBase::new("z")
            .with_rule(Rule::new("a").when("x", "low").unwrap())
            .with_rule(Rule::new("b").when("x", "high").unwrap());
        let z = rb.calc_consequence(&us, &observe(&[("x", 0.2)])).unwrap();

        let (d1, d2): (f64, f64) = (0.2 * 0.2, 0.8 * 0.8);
        let (v1, v2) = (2.0, 10.0);
        let expected = (v1 / (d1 * d1) + v2 / (d2 * d2)) / (1.0 / (d1 * d1) + 1.0 / (d2 * d2));
        assert!((z - expected).abs() < 1e-9);
    }

    fn scaled_output(high: f64) -> BTreeMap<String, Universe> {
        let mut out = Universe::new("z");
        out.add_term(Term::new("a", 0.0, 2.0)).unwrap();
        out.add_term(Term::new("b", 1.0, 10.0)).unwrap();
        let mut x = Universe::new("x");
        x.add_term(Term::new("low", 0.0, 0.0)).unwrap();
        x.add_term(Term::new("high", 1.0, high)).unwrap();
        BTreeMap::from([("x".to_string(), x), ("z".to_string(), out)])
    }

    fn low_high_rulebase() -> RuleBase {
        RuleBase::new("z")
            .with_rule(Rule::new("a").when("x", "low").unwrap())
            .with_rule(Rule::new("b").when("x", "high").unwrap())
    }

    #[test]
    fn tiny_distance_still_weights_toward_nearest_rule() {
        let z = low_high_rulebase()
            .calc_consequence(&scaled_output(1.0), &observe(&[("x", 1e-80)]))
            .unwrap();
        assert!((z - 2.0).abs() < 1e-9, "got {z}");
    }

    #[test]
    fn overflowing_distances_have_no_consequence() {
        // Both predicate distances are ~5e199, so every squared rule distance is infinite.
        let err = low_high_rulebase()
            .calc_consequence(&scaled_output(1e200), &observe(&[("x", 0.5)]))
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyAggregation { .. }));
    }

    #[test]
    fn empty_rulebase_has_no_consequence() {
        let err = RuleBase::new("z")
            .calc_consequence(&universes(&["z"]), &observe(&[]))
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyAggregation { .. }));
    }

    #[test]
    fn rule_without_predicates_cannot_be_scored() {
        let rb = RuleBase::new("z").with_rule(Rule::new("low"));
        let err = rb
            .calc_consequence(&universes(&["z"]), &observe(&[]))
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyAggregation { .. }));
    }

    #[test]
    fn missing_antecedent_is_undefined() {
        let err = xyz_rulebase()
            .calc_consequence(&universes(&["x", "y", "z"]), &observe(&[("x", 0.5)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::UndefinedReference {
                entity: Entity::Signal,
                ..
            }
        ));
    }

    #[test]
    fn unknown_consequent_is_undefined() {
        let rb = RuleBase::new("z").with_rule(Rule::new("medium").when("x", "low").unwrap());
        let err = rb
            .calc_consequence(&universes(&["x", "z"]), &observe(&[("x", 0.5)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::UndefinedReference {
                entity: Entity::Term,
                ..
            }
        ));
    }

    #[test]
    fn missing_output_universe_is_undefined() {
        let err = xyz_rulebase()
            .calc_consequence(&universes(&["x", "y"]), &observe(&[("x", 0.5), ("y", 0.5)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::UndefinedReference {
                entity: Entity::Universe,
                ..
            }
        ));
    }
}
