//! Universes: linguistic variables with piecewise-linear interpolation.
//!
//! A universe is an ordered set of [`Term`]s. Between two neighbouring term
//! centers the output value is interpolated linearly; outside the outermost
//! centers the universe is undefined. Distances between two inputs are
//! measured in value space, i.e. on the universe's output range.

use crate::error::{Entity, ModelError, ModelResult};

use super::term::Term;

/// A linguistic variable's domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Universe {
    name: String,
    description: Option<String>,
    /// Kept sorted by center; equal centers keep insertion order.
    terms: Vec<Term>,
}

impl Universe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            terms: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Add a term, keeping the terms ordered by center.
    pub fn add_term(&mut self, term: Term) -> ModelResult<()> {
        if self.term(term.name()).is_some() {
            return Err(ModelError::DuplicateDefinition {
                entity: Entity::Term,
                name: term.name().to_string(),
                scope: format!("universe \"{}\"", self.name),
            });
        }
        let at = self.terms.partition_point(|t| t.center() <= term.center());
        self.terms.insert(at, term);
        Ok(())
    }

    pub fn term(&self, name: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.name() == name)
    }

    /// Terms in ascending center order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn count_terms(&self) -> usize {
        self.terms.len()
    }

    /// The `[min, max]` span of term centers, if any term exists.
    pub fn domain(&self) -> Option<(f64, f64)> {
        let first = self.terms.first()?;
        let last = self.terms.last()?;
        Some((first.center(), last.center()))
    }

    /// Look up a term or report it as an undefined reference from `scope`.
    pub fn resolve_term(&self, name: &str, scope: &str) -> ModelResult<&Term> {
        self.term(name).ok_or_else(|| ModelError::UndefinedReference {
            entity: Entity::Term,
            name: name.to_string(),
            scope: format!("{scope} (universe \"{}\")", self.name),
        })
    }

    /// Interpolate the output value at domain coordinate `x`.
    pub fn calc_value(&self, x: f64) -> ModelResult<f64> {
        let (min, max) = self.domain().ok_or_else(|| ModelError::EmptyUniverse {
            universe: self.name.clone(),
        })?;

        if self.terms.len() == 1 {
            return Ok(self.terms[0].value());
        }

        if !(min <= x && x <= max) {
            return Err(ModelError::OutOfDomain {
                universe: self.name.clone(),
                value: x,
                min,
                max,
            });
        }

        let mut exact = self.terms.iter().filter(|t| t.center() == x);
        if let Some(first) = exact.next() {
            if let Some(other) = exact.find(|t| t.value() != first.value()) {
                return Err(ModelError::DegenerateInterpolation {
                    universe: self.name.clone(),
                    center: x,
                    first: first.value(),
                    second: other.value(),
                });
            }
            return Ok(first.value());
        }

        // x lies strictly inside the span and matches no center, so exactly
        // one pair of neighbours brackets it.
        let upper = self.terms.partition_point(|t| t.center() < x);
        let (lo, hi) = (&self.terms[upper - 1], &self.terms[upper]);
        let (x0, y0) = (lo.center(), lo.value());
        let (x1, y1) = (hi.center(), hi.value());

        Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
    }

    /// Distance between two domain points, measured on the output range.
    pub fn calc_distance(&self, a: f64, b: f64) -> ModelResult<f64> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Ok(self.calc_value(hi)? - self.calc_value(lo)?)
    }

    /// Check that term values consistently rise or fall in center order.
    pub fn check_monotonic(&self) -> ModelResult<()> {
        let mut rising = false;
        let mut falling = false;
        for pair in self.terms.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            rising |= b.value() > a.value();
            falling |= b.value() < a.value();
            if rising && falling {
                return Err(ModelError::NonMonotonic {
                    universe: self.name.clone(),
                    term: b.name().to_string(),
                });
            }
        }
        Ok(())
    }
}
