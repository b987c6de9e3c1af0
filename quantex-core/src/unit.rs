//! Unit representation with entity and SI conversion record

use std::fmt;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use crate::{Dimensions, Entity};

/// Name of the sentinel unit used for unresolvable surfaces
pub const UNKNOWN_UNIT: &str = "unknown";

/// Name of the unit attached to bare numbers
pub const DIMENSIONLESS: &str = "dimensionless";

/// Conversion to a named SI unit: `value_si = value * factor`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Name of the SI unit (e.g. "metre", "cubic metre", "newton")
    #[serde(rename = "silabel")]
    pub si_label: String,
    /// Multiplicative factor into `si_label`
    pub factor: f64,
}

impl Conversion {
    pub fn new(si_label: impl Into<String>, factor: f64) -> Self {
        Conversion { si_label: si_label.into(), factor }
    }
}

/// A concrete unit (e.g. "kilometre")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Unique key
    pub name: String,
    /// Physical quantity kind
    pub entity: Arc<Entity>,
    /// Canonical dimensions in terms of other units; `[{name, 1}]` for base units
    pub dimensions: Dimensions,
    /// Spelled-out forms ("kilometre", "kilometres")
    #[serde(default)]
    pub surfaces: Vec<String>,
    /// Case-sensitive abbreviations ("km")
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion: Option<Conversion>,
    /// Dimensions in the order a definition or mention spelled them, before canonicalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Language tag of the lexicon the unit was loaded from
    pub lang: String,
}

impl Unit {
    /// Create a unit with no surfaces, symbols or provenance
    pub fn new(
        name: impl Into<String>,
        entity: Arc<Entity>,
        dimensions: Dimensions,
        conversion: Option<Conversion>,
        lang: impl Into<String>,
    ) -> Self {
        Unit {
            name: name.into(),
            entity,
            dimensions,
            surfaces: Vec::new(),
            symbols: Vec::new(),
            conversion,
            original_dimensions: None,
            currency_code: None,
            uri: None,
            lang: lang.into(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_UNIT
    }

    pub fn is_dimensionless(&self) -> bool {
        self.name == DIMENSIONLESS
    }

    /// Check if two units measure the same kind of quantity
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.entity == other.entity
    }

    /// Convert a value of this unit into its SI unit, if a conversion is known
    pub fn to_si(&self, value: f64) -> Option<f64> {
        self.conversion.as_ref().map(|c| value * c.factor)
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.entity == other.entity && self.dimensions == other.dimensions
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length() -> Arc<Entity> {
        Arc::new(Entity::new("length", Dimensions::default(), None))
    }

    fn kilometre() -> Unit {
        let mut unit = Unit::new(
            "kilometre",
            length(),
            Dimensions::plain("kilometre"),
            Some(Conversion::new("metre", 1000.0)),
            "en",
        );
        unit.symbols.push("km".to_string());
        unit
    }

    #[test]
    fn test_equality_ignores_surfaces_and_provenance() {
        let a = kilometre();
        let mut b = kilometre();
        b.original_dimensions = Some(Dimensions::plain("kilometre"));
        let mut c = kilometre();
        c.symbols.clear();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(b.original_dimensions.is_some());
    }

    #[test]
    fn test_equality_includes_entity() {
        let a = kilometre();
        let mut b = kilometre();
        b.entity = Arc::new(Entity::new("distance", Dimensions::default(), None));
        assert_ne!(a, b);
        assert!(!a.is_compatible(&b));
    }

    #[test]
    fn test_to_si() {
        assert_eq!(kilometre().to_si(5.0), Some(5000.0));
        let mut bare = kilometre();
        bare.conversion = None;
        assert_eq!(bare.to_si(5.0), None);
    }

    #[test]
    fn test_conversion_serde_label() {
        let c: Conversion = serde_json::from_str(r#"{"silabel": "metre", "factor": 0.3048}"#).unwrap();
        assert_eq!(c.si_label, "metre");
    }
}
