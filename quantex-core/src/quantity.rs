//! Quantity type - one recognized mention of a value with a unit

use std::fmt;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use crate::Unit;

/// A quantity found in text (e.g. "4.2 gallons")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Arc<Unit>,
    /// Exact substring of the original input
    pub surface: String,
    /// Byte offsets of `surface` in the original input
    pub span: (usize, usize),
    /// Half-width of a range or the ± term, on the same scale as `value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
    pub lang: String,
}

impl Quantity {
    pub fn new(
        value: f64,
        unit: Arc<Unit>,
        surface: impl Into<String>,
        span: (usize, usize),
        uncertainty: Option<f64>,
        lang: impl Into<String>,
    ) -> Self {
        Quantity {
            value,
            unit,
            surface: surface.into(),
            span,
            uncertainty,
            lang: lang.into(),
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    /// Value expressed in the unit's SI unit, if the unit carries a conversion
    pub fn si_value(&self) -> Option<f64> {
        self.unit.to_si(self.value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(uncertainty) = self.uncertainty {
            write!(f, " ± {}", uncertainty)?;
        }
        if !self.is_dimensionless() {
            write!(f, " {}", self.unit.name)?;
        }
        Ok(())
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.unit == other.unit
            && self.surface == other.surface
            && self.span == other.span
            && self.uncertainty == other.uncertainty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Conversion, Dimensions, Entity};

    fn gallon() -> Arc<Unit> {
        let volume = Arc::new(Entity::new("volume", Dimensions::default(), None));
        Arc::new(Unit::new(
            "gallon",
            volume,
            Dimensions::plain("gallon"),
            Some(Conversion::new("cubic metre", 0.003785411784)),
            "en",
        ))
    }

    #[test]
    fn test_display() {
        let q = Quantity::new(4.2, gallon(), "4.2 gallons", (0, 11), None, "en");
        assert_eq!(q.to_string(), "4.2 gallon");

        let q = Quantity::new(12.5, gallon(), "10-15 gallons", (0, 13), Some(2.5), "en");
        assert_eq!(q.to_string(), "12.5 ± 2.5 gallon");
    }

    #[test]
    fn test_si_value() {
        let q = Quantity::new(2.0, gallon(), "2 gallons", (0, 9), None, "en");
        let si = q.si_value().unwrap();
        assert!((si - 0.007570823568).abs() < 1e-12);
    }

    #[test]
    fn test_equality_ignores_lang() {
        let a = Quantity::new(1.0, gallon(), "1 gallon", (0, 8), None, "en");
        let mut b = a.clone();
        b.lang = "en_us".to_string();
        assert_eq!(a, b);
        b.span = (1, 9);
        assert_ne!(a, b);
    }
}
