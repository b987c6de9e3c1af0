//! Dimension vectors
//!
//! A unit or entity is described as a product of more fundamental bases, each
//! raised to an integer power: `kilometre per hour` is
//! `[{kilometre, 1}, {hour, -1}]`, `speed` is `[{length, 1}, {time, -1}]`.
//! The canonical form of a vector has one entry per base, no zero powers and
//! is sorted by base name; its [`DimensionKey`] is what the derived-unit and
//! derived-entity tables are keyed on.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};

/// One `{base, power}` term of a dimension vector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    /// Unit or entity name
    pub base: String,
    /// Non-zero integer power
    pub power: i32,
}

impl Dimension {
    pub fn new(base: impl Into<String>, power: i32) -> Self {
        Dimension { base: base.into(), power }
    }
}

/// Ordered sequence of dimension terms
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimensions(Vec<Dimension>);

impl Dimensions {
    pub fn new(terms: Vec<Dimension>) -> Self {
        Dimensions(terms)
    }

    /// `[{base, 1}]`
    pub fn plain(base: impl Into<String>) -> Self {
        Dimensions(vec![Dimension::new(base, 1)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dimension> {
        self.0.iter()
    }

    pub fn terms(&self) -> &[Dimension] {
        &self.0
    }

    pub fn push(&mut self, term: Dimension) {
        self.0.push(term);
    }

    /// True if this is exactly `[{base, 1}]`
    pub fn is_plain(&self, base: &str) -> bool {
        matches!(self.0.as_slice(), [d] if d.base == base && d.power == 1)
    }

    /// Merge terms sharing a base, drop zero powers, sort by base name
    pub fn canonical(&self) -> Dimensions {
        let mut merged: BTreeMap<&str, i32> = BTreeMap::new();
        for term in &self.0 {
            *merged.entry(term.base.as_str()).or_insert(0) += term.power;
        }
        Dimensions(
            merged
                .into_iter()
                .filter(|(_, power)| *power != 0)
                .map(|(base, power)| Dimension::new(base, power))
                .collect(),
        )
    }

    /// Multiply (concatenate terms, then canonicalize)
    pub fn multiply(&self, other: &Dimensions) -> Dimensions {
        let mut terms = self.0.clone();
        terms.extend(other.0.iter().cloned());
        Dimensions(terms).canonical()
    }

    /// Raise every term to `exp`
    pub fn power(&self, exp: i32) -> Dimensions {
        Dimensions(
            self.0
                .iter()
                .map(|d| Dimension::new(d.base.as_str(), d.power * exp))
                .collect(),
        )
    }

    /// Divide (multiply by the inverse)
    pub fn divide(&self, other: &Dimensions) -> Dimensions {
        self.multiply(&other.power(-1))
    }

    /// Lookup key of the canonical form
    pub fn key(&self) -> DimensionKey {
        DimensionKey(
            self.canonical()
                .0
                .into_iter()
                .map(|d| (d.base, d.power))
                .collect(),
        )
    }
}

impl FromIterator<Dimension> for Dimensions {
    fn from_iter<I: IntoIterator<Item = Dimension>>(iter: I) -> Self {
        Dimensions(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dimensions {
    type Item = &'a Dimension;
    type IntoIter = std::slice::Iter<'a, Dimension>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "1");
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|d| {
                if d.power == 1 {
                    d.base.clone()
                } else {
                    format!("{}^{}", d.base, d.power)
                }
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Hashable key of a canonical dimension vector: `(base, power)` pairs sorted by base
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DimensionKey(Vec<(String, i32)>);

impl DimensionKey {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, i32)] {
        &self.0
    }

    /// Key for a single `{base, power}` term
    pub fn single(base: impl Into<String>, power: i32) -> Self {
        DimensionKey(vec![(base.into(), power)])
    }
}

impl fmt::Display for DimensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(b, p)| format!("{}^{}", b, p)).collect();
        write!(f, "({})", parts.join(", "))
    }
}
