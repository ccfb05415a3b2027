use std::ops::Index;

use crate::float::Float;
use crate::value::Value;

/// Partial derivatives of one node, keyed by variable name.
///
/// Entries keep the order in which the variables first appear in the graph.
/// A name with no entry has a zero partial.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Derivatives<F: Float> {
    entries: Vec<(String, Value<F>)>,
}

impl<F: Float> Default for Derivatives<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Derivatives<F> {
    pub fn new() -> Self {
        Derivatives {
            entries: Vec::new(),
        }
    }

    /// Insert or replace the partial for `name`.
    pub fn insert(&mut self, name: impl Into<String>, partial: Value<F>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = partial,
            None => self.entries.push((name, partial)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value<F>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value<F>> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Scalar partial for `name`, if present and scalar.
    pub fn scalar(&self, name: &str) -> Option<F> {
        self.get(name).and_then(Value::as_scalar)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<F>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: Float> Index<&str> for Derivatives<F> {
    type Output = Value<F>;

    /// Panics if `name` has no entry.
    fn index(&self, name: &str) -> &Value<F> {
        self.get(name)
            .unwrap_or_else(|| panic!("no derivative with respect to {name:?}"))
    }
}
