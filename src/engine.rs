//! Engine facade: top-level API for the fribe system.
//!
//! The `Engine` owns the compiled universes and rulebases and the committed
//! state snapshot, and runs evaluation cycles. A cycle either succeeds for
//! every rulebase and replaces the state as a whole, or fails and leaves the
//! state exactly as it was.

use std::collections::{BTreeMap, HashMap};

use crate::config::EngineConfig;
use crate::error::{Entity, ModelError, ModelResult};
use crate::model::{RuleBase, Universe};
use crate::snapshot::Snapshot;

/// The fribe behavior engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
    universes: BTreeMap<String, Universe>,
    rulebases: BTreeMap<String, RuleBase>,
    state: Snapshot,
}

impl Engine {
    /// Create an empty engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Add a universe. Names must be unique within the engine.
    pub fn add_universe(&mut self, universe: Universe) -> ModelResult<()> {
        if self.universes.contains_key(universe.name()) {
            return Err(ModelError::DuplicateDefinition {
                entity: Entity::Universe,
                name: universe.name().to_string(),
                scope: "engine".into(),
            });
        }
        if self.config.strict_monotonic {
            universe.check_monotonic()?;
        }
        tracing::debug!(
            universe = universe.name(),
            terms = universe.count_terms(),
            "added universe"
        );
        self.universes.insert(universe.name().to_string(), universe);
        Ok(())
    }

    /// Add a rulebase. Names must be unique within the engine.
    pub fn add_rulebase(&mut self, rulebase: RuleBase) -> ModelResult<()> {
        if self.rulebases.contains_key(rulebase.name()) {
            return Err(ModelError::DuplicateDefinition {
                entity: Entity::RuleBase,
                name: rulebase.name().to_string(),
                scope: "engine".into(),
            });
        }
        tracing::debug!(
            rulebase = rulebase.name(),
            rules = rulebase.rules().len(),
            "added rulebase"
        );
        self.rulebases.insert(rulebase.name().to_string(), rulebase);
        Ok(())
    }

    pub fn universe(&self, name: &str) -> Option<&Universe> {
        self.universes.get(name)
    }

    pub fn rulebase(&self, name: &str) -> Option<&RuleBase> {
        self.rulebases.get(name)
    }

    /// Universes in name order.
    pub fn universes(&self) -> impl Iterator<Item = &Universe> {
        self.universes.values()
    }

    /// Rulebases in name order.
    pub fn rulebases(&self) -> impl Iterator<Item = &RuleBase> {
        self.rulebases.values()
    }

    pub fn universe_names(&self) -> Vec<&str> {
        self.universes.keys().map(String::as_str).collect()
    }

    pub fn rulebase_names(&self) -> Vec<&str> {
        self.rulebases.keys().map(String::as_str).collect()
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Set a single signal of the committed state.
    pub fn set_state(&mut self, name: impl Into<String>, value: f64) {
        self.state.set(name, value);
    }

    /// Read a signal of the committed state.
    pub fn get_state(&self, name: &str) -> ModelResult<f64> {
        self.state
            .get(name)
            .ok_or_else(|| ModelError::UndefinedReference {
                entity: Entity::Signal,
                name: name.to_string(),
                scope: "engine state".into(),
            })
    }

    /// The committed state. Later cycles never change a returned snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.state.clone()
    }

    /// Run one evaluation cycle.
    ///
    /// Every rulebase is evaluated against the committed state overlaid with
    /// `observations`. The results replace the matching signals only if all
    /// rulebases succeed.
    pub fn calc_consequences(&mut self, observations: &HashMap<String, f64>) -> ModelResult<()> {
        let inputs = self.state.overlay(observations);
        let mut results = BTreeMap::new();

        for (name, rulebase) in &self.rulebases {
            match rulebase.calc_consequence(&self.universes, &inputs) {
                Ok(value) => {
                    tracing::trace!(rulebase = %name, value, "rulebase evaluated");
                    results.insert(name.clone(), value);
                }
                Err(e) => {
                    tracing::debug!(rulebase = %name, error = %e, "cycle aborted, state unchanged");
                    return Err(e);
                }
            }
        }

        self.state = Snapshot::from(self.state.overlay(&results));
        tracing::debug!(signals = self.state.len(), "cycle committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Rule, Term};

    fn two_point(name: &str) -> Universe {
        let mut u = Universe::new(name);
        u.add_term(Term::new("low", 0.0, 0.0)).unwrap();
        u.add_term(Term::new("high", 1.0, 1.0)).unwrap();
        u
    }

    fn xyz_engine() -> Engine {
        let mut engine = Engine::default();
        for name in ["x", "y", "z"] {
            engine.add_universe(two_point(name)).unwrap();
        }
        let rb = RuleBase::new("z")
            .with_rule(
                Rule::new("high")
                    .when("x", "high")
                    .and_then(|r| r.when("y", "high"))
                    .unwrap(),
            )
            .with_rule(Rule::new("low").when("x", "low").unwrap())
            .with_rule(Rule::new("low").when("y", "low").unwrap());
        engine.add_rulebase(rb).unwrap();
        engine
    }

    fn obs(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn duplicate_universe_is_rejected() {
        let mut engine = xyz_engine();
        let err = engine.add_universe(two_point("x")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::DuplicateDefinition {
                entity: Entity::Universe,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_rulebase_is_rejected() {
        let mut engine = xyz_engine();
        let err = engine.add_rulebase(RuleBase::new("z")).unwrap_err();
        assert!(matches!(
            err,
            ModelError::DuplicateDefinition {
                entity: Entity::RuleBase,
                ..
            }
        ));
    }

    #[test]
    fn strict_mode_rejects_non_monotonic_universe() {
        let mut peak = two_point("p");
        peak.add_term(Term::new("top", 0.5, 3.0)).unwrap();

        let mut lenient = Engine::default();
        assert!(lenient.add_universe(peak.clone()).is_ok());

        let mut strict = Engine::new(EngineConfig {
            strict_monotonic: true,
        });
        let err = strict.add_universe(peak).unwrap_err();
        assert!(matches!(err, ModelError::NonMonotonic { .. }));
        assert!(strict.universe("p").is_none());
    }

    #[test]
    fn state_round_trips() {
        let mut engine = Engine::default();
        assert!(engine.get_state("z").is_err());
        engine.set_state("z", 0.75);
        assert_eq!(engine.get_state("z").unwrap(), 0.75);
    }

    #[test]
    fn cycles_commit_results() {
        let mut engine = xyz_engine();
        let cases = [
            (0.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 1.0),
            (0.5, 0.5, 1.0 / 3.0),
        ];
        for (x, y, z) in cases {
            engine.calc_consequences(&obs(&[("x", x), ("y", y)])).unwrap();
            assert_eq!(engine.get_state("z").unwrap(), z, "x = {x}, y = {y}");
        }
    }

    #[test]
    fn observations_are_not_committed() {
        let mut engine = xyz_engine();
        engine.calc_consequences(&obs(&[("x", 1.0), ("y", 1.0)])).unwrap();
        assert!(engine.get_state("x").is_err());
        assert_eq!(engine.snapshot().len(), 1);
    }

    #[test]
    fn state_feeds_antecedents() {
        let mut engine = xyz_engine();
        engine.set_state("y", 1.0);
        engine.calc_consequences(&obs(&[("x", 1.0)])).unwrap();
        assert_eq!(engine.get_state("z").unwrap(), 1.0);
        assert_eq!(engine.get_state("y").unwrap(), 1.0);
    }

    #[test]
    fn failed_cycle_leaves_state_untouched() {
        let mut engine = xyz_engine();
        engine.add_universe(two_point("w")).unwrap();
        engine
            .add_rulebase(RuleBase::new("w").with_rule(Rule::new("high").when("q", "low").unwrap()))
            .unwrap();
        engine.set_state("z", 0.25);
        engine.set_state("w", 0.5);
        let before = engine.snapshot();

        // "w" fails (no universe "q"), so neither "w" nor "z" may change.
        let err = engine.calc_consequences(&obs(&[("x", 1.0), ("y", 1.0)]));
        assert!(err.is_err());
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.get_state("z").unwrap(), 0.25);
    }

    #[test]
    fn held_snapshot_is_isolated_from_later_cycles() {
        let mut engine = xyz_engine();
        engine.calc_consequences(&obs(&[("x", 0.0), ("y", 0.0)])).unwrap();
        let held = engine.snapshot();
        engine.calc_consequences(&obs(&[("x", 1.0), ("y", 1.0)])).unwrap();
        assert_eq!(held.get("z"), Some(0.0));
        assert_eq!(engine.get_state("z").unwrap(), 1.0);
    }
}
