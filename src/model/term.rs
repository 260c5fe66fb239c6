//! Terms: named anchor points of a universe.

/// A named anchor point of a [`Universe`](super::Universe).
///
/// `center` lies on the input axis (the domain), `value` on the output axis
/// (the range). A universe interpolates linearly between neighbouring terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    name: String,
    center: f64,
    value: f64,
}

impl Term {
    pub fn new(name: impl Into<String>, center: f64, value: f64) -> Self {
        Self {
            name: name.into(),
            center,
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}
