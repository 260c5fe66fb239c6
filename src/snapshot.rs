//! Immutable signal snapshots.
//!
//! The engine's state is a [`Snapshot`]: a shared, copy-on-write map from
//! signal name to value. Writers never mutate a snapshot another holder can
//! see; they produce a new one. An evaluation cycle builds its results on the
//! side and swaps the whole snapshot in at the end.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A committed map of signal name → value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    signals: Arc<BTreeMap<String, f64>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.signals.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// A copy of this snapshot with `name` set to `value`.
    pub fn with(&self, name: impl Into<String>, value: f64) -> Self {
        let mut signals = (*self.signals).clone();
        signals.insert(name.into(), value);
        Self::from(signals)
    }

    /// This snapshot overlaid with `signals`; entries of `signals` win.
    pub fn overlay<'a>(
        &self,
        signals: impl IntoIterator<Item = (&'a String, &'a f64)>,
    ) -> BTreeMap<String, f64> {
        let mut merged = (*self.signals).clone();
        merged.extend(signals.into_iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }

    pub(crate) fn set(&mut self, name: impl Into<String>, value: f64) {
        Arc::make_mut(&mut self.signals).insert(name.into(), value);
    }
}

impl From<BTreeMap<String, f64>> for Snapshot {
    fn from(signals: BTreeMap<String, f64>) -> Self {
        Self {
            signals: Arc::new(signals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_snapshot_is_empty() {
        let snap = Snapshot::new();
        assert!(snap.is_empty());
        assert!(!snap.with("x", 1.0).is_empty());
    }

    #[test]
    fn with_leaves_original_untouched() {
        let a = Snapshot::new().with("x", 1.0);
        let b = a.with("x", 2.0);
        assert_eq!(a.get("x"), Some(1.0));
        assert_eq!(b.get("x"), Some(2.0));
    }

    #[test]
    fn set_copies_shared_snapshot() {
        let mut a = Snapshot::new().with("x", 1.0);
        let held = a.clone();
        a.set("x", 5.0);
        assert_eq!(held.get("x"), Some(1.0));
        assert_eq!(a.get("x"), Some(5.0));
    }

    #[test]
    fn overlay_prefers_new_entries() {
        let base = Snapshot::new().with("x", 1.0).with("z", 0.5);
        let obs: BTreeMap<String, f64> = [("x".to_string(), 3.0)].into_iter().collect();
        let merged = base.overlay(&obs);
        assert_eq!(merged["x"], 3.0);
        assert_eq!(merged["z"], 0.5);
    }

    #[test]
    fn serializes_as_plain_map() {
        let snap = Snapshot::new().with("b", 2.0).with("a", 1.0);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"a":1.0,"b":2.0}"#);
    }
}
