//! Registry of named SI units used as conversion targets

use quantex_core::{Conversion, Dimensions, QuantError};
use crate::defs::SiDef;

static SI_UNITS: &str = include_str!("../data/si_units.json");

/// Named SI units with their dimensions in SI base units, in table order
#[derive(Debug, Clone)]
pub struct SiRegistry {
    units: Vec<SiDef>,
}

impl SiRegistry {
    /// Registry from the embedded table
    pub fn standard() -> Result<Self, QuantError> {
        Self::from_json(SI_UNITS)
    }

    pub fn from_json(source: &str) -> Result<Self, QuantError> {
        let units: Vec<SiDef> = serde_json::from_str(source)
            .map_err(|e| QuantError::construction(format!("Invalid SI unit table: {}", e)))?;
        let units = units
            .into_iter()
            .map(|d| SiDef { name: d.name, dimensions: d.dimensions.canonical() })
            .collect();
        Ok(SiRegistry { units })
    }

    /// Dimensions of a named SI unit
    pub fn dimensions(&self, name: &str) -> Option<&Dimensions> {
        self.units.iter().find(|u| u.name == name).map(|u| &u.dimensions)
    }

    /// First registry unit whose dimensions equal `dimensions` after canonicalization
    pub fn name_for(&self, dimensions: &Dimensions) -> Option<&str> {
        let canonical = dimensions.canonical();
        self.units
            .iter()
            .find(|u| u.dimensions == canonical)
            .map(|u| u.name.as_str())
    }

    /// Conversion of a product of units, each given by its own conversion and power.
    ///
    /// Returns `None` if a component label is not in the registry or the
    /// composed dimensions have no named SI unit.
    pub fn compose<'a, I>(&self, parts: I) -> Option<Conversion>
    where
        I: IntoIterator<Item = (&'a Conversion, i32)>,
    {
        let mut dims = Dimensions::default();
        let mut factor = 1.0;
        for (conversion, power) in parts {
            let si = self.dimensions(&conversion.si_label)?;
            dims = dims.multiply(&si.power(power));
            factor *= conversion.factor.powi(power);
        }
        let label = self.name_for(&dims)?;
        Some(Conversion::new(label, factor))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SiRegistry {
        SiRegistry::standard().unwrap()
    }

    #[test]
    fn test_standard_table_loads() {
        let si = registry();
        assert!(si.len() > 10);
        assert!(si.dimensions("joule").is_some());
    }

    #[test]
    fn test_compose_speed() {
        let si = registry();
        let km = Conversion::new("metre", 1000.0);
        let h = Conversion::new("second", 3600.0);
        let c = si.compose([(&km, 1), (&h, -1)]).unwrap();
        assert_eq!(c.si_label, "metre per second");
        assert!((c.factor - 1000.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn test_compose_energy_from_power_and_time() {
        let si = registry();
        let kw = Conversion::new("watt", 1000.0);
        let h = Conversion::new("second", 3600.0);
        let c = si.compose([(&kw, 1), (&h, 1)]).unwrap();
        assert_eq!(c.si_label, "joule");
        assert!((c.factor - 3.6e6).abs() < 1e-6);
    }

    #[test]
    fn test_compose_unknown() {
        let si = registry();
        let m = Conversion::new("metre", 1.0);
        let s = Conversion::new("second", 1.0);
        assert!(si.compose([(&m, 5), (&s, 1)]).is_none());
        let bogus = Conversion::new("furlong", 1.0);
        assert!(si.compose([(&bogus, 1)]).is_none());
    }
}
