//! Unit table: surface and symbol indexes plus derived-unit lookup

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;
use quantex_core::{
    Conversion, DimensionKey, Dimensions, QuantError, Unit, DIMENSIONLESS, UNKNOWN_ENTITY, UNKNOWN_UNIT,
};
use crate::defs::{decode, RawTable, UnitDef};
use crate::entities::Entities;
use crate::prefixes;
use crate::si::SiRegistry;

const CURRENCY: &str = "currency";

/// Loaded units for one language
#[derive(Debug, Clone)]
pub struct Units {
    names: BTreeMap<String, Arc<Unit>>,
    symbols: HashMap<String, BTreeSet<String>>,
    symbols_lower: HashMap<String, BTreeSet<String>>,
    surfaces: HashMap<String, BTreeSet<String>>,
    surfaces_lower: HashMap<String, BTreeSet<String>>,
    prefix_symbols: BTreeSet<String>,
    /// Unit dimensions expanded down to base units
    expanded: HashMap<String, Dimensions>,
    /// Candidates per dimension key, sorted by name
    derived: HashMap<DimensionKey, Vec<Arc<Unit>>>,
    unknown: Arc<Unit>,
    dimensionless: Arc<Unit>,
}

impl Units {
    pub fn build(table: &RawTable, entities: &Entities, si: &SiRegistry, lang: &str) -> Result<Self, QuantError> {
        let defs = expand_prefixes(table)?;

        for (name, def) in &defs {
            let entity = def.entity.as_deref().unwrap_or_default();
            if !entities.contains(entity) {
                return Err(QuantError::construction(format!(
                    "Unknown entity '{}' for unit '{}'", entity, name
                )));
            }
            for term in &def.dimensions {
                if !defs.contains_key(&term.base) {
                    return Err(QuantError::construction(format!(
                        "Unit '{}' refers to unknown unit '{}'", name, term.base
                    )));
                }
            }
        }

        let mut expanded = HashMap::new();
        for name in defs.keys() {
            let mut stack = Vec::new();
            expanded.insert(name.clone(), expand(name, &defs, &mut stack)?);
        }

        let mut conversions: HashMap<String, Option<Conversion>> = HashMap::new();
        for name in defs.keys() {
            resolve_conversion(name, &defs, si, &mut conversions);
        }

        let mut units = Units {
            names: BTreeMap::new(),
            symbols: HashMap::new(),
            symbols_lower: HashMap::new(),
            surfaces: HashMap::new(),
            surfaces_lower: HashMap::new(),
            prefix_symbols: BTreeSet::new(),
            expanded,
            derived: HashMap::new(),
            unknown: placeholder(lang),
            dimensionless: placeholder(lang),
        };

        for (name, def) in defs {
            let entity = def
                .entity
                .as_deref()
                .and_then(|e| entities.get(e))
                .cloned()
                .ok_or_else(|| QuantError::construction(format!("Unit '{}' has no entity", name)))?;
            let dimensions = if def.dimensions.is_empty() {
                Dimensions::plain(&name)
            } else {
                def.dimensions
            };
            let conversion = conversions.get(&name).cloned().flatten();

            let mut unit = Unit::new(name.clone(), entity, dimensions.clone(), conversion, lang);
            unit.original_dimensions = Some(dimensions);
            unit.surfaces = def.surfaces;
            unit.symbols = def.symbols;
            unit.uri = def.uri;
            unit.currency_code = def.currency_code;
            units.insert(Arc::new(unit));
        }

        units.unknown = units.require(UNKNOWN_UNIT)?;
        units.dimensionless = units.require(DIMENSIONLESS)?;

        for candidates in units.derived.values_mut() {
            candidates.sort_by(|a, b| a.name.cmp(&b.name));
            candidates.dedup_by(|a, b| a.name == b.name);
        }

        debug!(
            lang,
            units = units.names.len(),
            surfaces = units.surfaces.len(),
            symbols = units.symbols.len(),
            "units loaded"
        );
        Ok(units)
    }

    fn insert(&mut self, unit: Arc<Unit>) {
        let name = unit.name.clone();
        for symbol in &unit.symbols {
            self.symbols.entry(symbol.clone()).or_default().insert(name.clone());
            self.symbols_lower.entry(symbol.to_lowercase()).or_default().insert(name.clone());
            if unit.entity.name == CURRENCY {
                self.prefix_symbols.insert(symbol.clone());
            }
        }
        for surface in &unit.surfaces {
            self.surfaces.entry(surface.clone()).or_default().insert(name.clone());
            self.surfaces_lower.entry(surface.to_lowercase()).or_default().insert(name.clone());
        }

        let mut keys = vec![Dimensions::plain(&name).key(), unit.dimensions.key()];
        if let Some(full) = self.expanded.get(&name) {
            keys.push(full.key());
        }
        for key in keys {
            self.derived.entry(key).or_default().push(unit.clone());
        }
        self.names.insert(name, unit);
    }

    fn require(&self, name: &str) -> Result<Arc<Unit>, QuantError> {
        self.names
            .get(name)
            .cloned()
            .ok_or_else(|| QuantError::construction(format!("Missing built-in unit '{}'", name)))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Unit>> {
        self.names.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(|s| s.as_str())
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&BTreeSet<String>> {
        self.symbols.get(symbol)
    }

    /// Lookup by lowercased symbol; `symbol` must already be lowercase
    pub fn by_symbol_lower(&self, symbol: &str) -> Option<&BTreeSet<String>> {
        self.symbols_lower.get(symbol)
    }

    pub fn by_surface(&self, surface: &str) -> Option<&BTreeSet<String>> {
        self.surfaces.get(surface)
    }

    /// Lookup by lowercased surface; `surface` must already be lowercase
    pub fn by_surface_lower(&self, surface: &str) -> Option<&BTreeSet<String>> {
        self.surfaces_lower.get(surface)
    }

    /// Every surface and symbol a unit token may be spelled with
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().chain(self.symbols.keys()).map(|s| s.as_str())
    }

    /// Symbols that may precede a number ("$")
    pub fn prefix_symbols(&self) -> impl Iterator<Item = &str> {
        self.prefix_symbols.iter().map(|s| s.as_str())
    }

    /// Units indexed under this key (plain, defined or expanded), alphabetically
    pub fn derived(&self, key: &DimensionKey) -> &[Arc<Unit>] {
        self.derived.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Dimensions of a unit in terms of base units
    pub fn expanded(&self, name: &str) -> Option<&Dimensions> {
        self.expanded.get(name)
    }

    /// Sentinel for unresolvable surfaces
    pub fn unknown(&self) -> &Arc<Unit> {
        &self.unknown
    }

    /// Unit of bare numbers
    pub fn dimensionless(&self) -> &Arc<Unit> {
        &self.dimensionless
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn placeholder(lang: &str) -> Arc<Unit> {
    Arc::new(Unit::new(
        UNKNOWN_UNIT,
        Arc::new(quantex_core::Entity::unknown(Dimensions::default())),
        Dimensions::plain(UNKNOWN_UNIT),
        None,
        lang,
    ))
}

/// Decode every entry and add the units its prefixes generate.
/// Explicit entries win over generated ones with the same name.
fn expand_prefixes(table: &RawTable) -> Result<BTreeMap<String, UnitDef>, QuantError> {
    let mut explicit: BTreeMap<String, UnitDef> = BTreeMap::new();
    for (name, props) in table {
        explicit.insert(name.clone(), decode(name, props, "unit")?);
    }
    explicit.entry(UNKNOWN_UNIT.to_string()).or_insert_with(|| UnitDef {
        entity: Some(UNKNOWN_ENTITY.to_string()),
        ..Default::default()
    });
    explicit.entry(DIMENSIONLESS.to_string()).or_insert_with(|| UnitDef {
        entity: Some(DIMENSIONLESS.to_string()),
        ..Default::default()
    });

    let mut generated = Vec::new();
    for (name, def) in &explicit {
        generated.extend(prefixes::expand(name, def)?);
    }
    for (name, def) in generated {
        if explicit.contains_key(&name) {
            debug!(unit = %name, "explicit entry shadows prefixed unit");
            continue;
        }
        explicit.insert(name, def);
    }
    Ok(explicit)
}

fn expand(name: &str, defs: &BTreeMap<String, UnitDef>, stack: &mut Vec<String>) -> Result<Dimensions, QuantError> {
    let def = defs
        .get(name)
        .ok_or_else(|| QuantError::construction(format!("Unknown unit '{}'", name)))?;
    if def.dimensions.is_empty() || def.dimensions.is_plain(name) {
        return Ok(Dimensions::plain(name));
    }
    if stack.iter().any(|s| s == name) {
        return Err(QuantError::construction(format!(
            "Cyclic unit definition: {} -> {}", stack.join(" -> "), name
        )));
    }
    stack.push(name.to_string());
    let mut out = Dimensions::default();
    for term in &def.dimensions {
        let inner = expand(&term.base, defs, stack)?;
        out = out.multiply(&inner.power(term.power));
    }
    stack.pop();
    Ok(out)
}

/// Explicit conversion, or one composed from the unit's components.
/// Called after cycle detection, so recursion terminates.
fn resolve_conversion(
    name: &str,
    defs: &BTreeMap<String, UnitDef>,
    si: &SiRegistry,
    memo: &mut HashMap<String, Option<Conversion>>,
) -> Option<Conversion> {
    if let Some(known) = memo.get(name) {
        return known.clone();
    }
    let def = defs.get(name)?;
    let resolved = match &def.conversion {
        Some(c) => Some(c.clone()),
        None if def.dimensions.is_empty() || def.dimensions.is_plain(name) => None,
        None => {
            let mut parts = Vec::with_capacity(def.dimensions.len());
            let mut complete = true;
            for term in &def.dimensions {
                match resolve_conversion(&term.base, defs, si, memo) {
                    Some(c) => parts.push((c, term.power)),
                    None => complete = false,
                }
            }
            if complete {
                si.compose(parts.iter().map(|(c, p)| (c, *p)))
            } else {
                None
            }
        }
    };
    memo.insert(name.to_string(), resolved.clone());
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::parse_table;
    use quantex_core::Dimension;

    const ENTITIES: &str = r#"{
        "dimensionless": {},
        "length": {},
        "time": {},
        "currency": {},
        "speed": {"dimensions": [{"base": "length", "power": 1}, {"base": "time", "power": -1}]}
    }"#;

    const UNITS: &str = r#"{
        "metre": {"entity": "length", "symbols": ["m"], "surfaces": ["metre", "metres"],
                  "conversion": {"silabel": "metre", "factor": 1.0}, "prefixes": ["k"]},
        "hour": {"entity": "time", "symbols": ["h"], "surfaces": ["hour"],
                 "conversion": {"silabel": "second", "factor": 3600.0}},
        "second": {"entity": "time", "symbols": ["s"], "surfaces": ["second"],
                   "conversion": {"silabel": "second", "factor": 1.0}},
        "kilometre per hour": {"entity": "speed", "symbols": ["kph"],
                               "dimensions": [{"base": "kilometre", "power": 1}, {"base": "hour", "power": -1}]},
        "metre per second": {"entity": "speed",
                             "dimensions": [{"base": "metre", "power": 1}, {"base": "second", "power": -1}]},
        "dollar": {"entity": "currency", "symbols": ["$"], "surfaces": ["dollar"]}
    }"#;

    fn build(units: &str) -> Result<Units, QuantError> {
        let entities = Entities::build(&parse_table(ENTITIES, "entity")?)?;
        let si = SiRegistry::standard()?;
        Units::build(&parse_table(units, "unit")?, &entities, &si, "en")
    }

    fn key(terms: &[(&str, i32)]) -> DimensionKey {
        terms.iter().map(|(b, p)| Dimension::new(*b, *p)).collect::<Dimensions>().key()
    }

    #[test]
    fn test_prefix_expansion() {
        let units = build(UNITS).unwrap();
        let km = units.get("kilometre").unwrap();
        assert_eq!(km.symbols, vec!["km"]);
        assert!(km.surfaces.contains(&"kilometres".to_string()));
        assert_eq!(km.conversion.as_ref().map(|c| c.factor), Some(1000.0));
        assert!(km.dimensions.is_plain("kilometre"));
        assert_eq!(km.original_dimensions, Some(Dimensions::plain("kilometre")));
        assert!(units.by_symbol("km").unwrap().contains("kilometre"));
    }

    #[test]
    fn test_sentinels() {
        let units = build(UNITS).unwrap();
        assert!(units.unknown().is_unknown());
        assert_eq!(units.unknown().entity.name, UNKNOWN_ENTITY);
        assert!(units.dimensionless().is_dimensionless());
    }

    #[test]
    fn test_indexes() {
        let units = build(UNITS).unwrap();
        assert!(units.by_surface("metre").is_some());
        assert!(units.by_surface_lower("hour").is_some());
        assert!(units.by_symbol_lower("kph").is_some());
        assert_eq!(units.prefix_symbols().collect::<Vec<_>>(), vec!["$"]);
        assert!(units.spellings().any(|s| s == "kilometre"));
    }

    #[test]
    fn test_derived_lookup() {
        let units = build(UNITS).unwrap();
        let plain = units.derived(&key(&[("hour", 1)]));
        assert_eq!(plain[0].name, "hour");
        let defined = units.derived(&key(&[("kilometre", 1), ("hour", -1)]));
        assert_eq!(defined[0].name, "kilometre per hour");
        let expanded = units.expanded("kilometre per hour").unwrap();
        assert_eq!(expanded.key(), key(&[("hour", -1), ("kilometre", 1)]));
    }

    #[test]
    fn test_computed_conversion() {
        let units = build(UNITS).unwrap();
        let kph = units.get("kilometre per hour").unwrap();
        let conversion = kph.conversion.as_ref().unwrap();
        assert_eq!(conversion.si_label, "metre per second");
        assert!((conversion.factor - 1.0 / 3.6).abs() < 1e-12);
        assert!(units.get("dollar").unwrap().conversion.is_none());
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        let err = build(r#"{"furlong": {"entity": "distance"}}"#).unwrap_err();
        assert_eq!(err, QuantError::Construction("Unknown entity 'distance' for unit 'furlong'".to_string()));
    }

    #[test]
    fn test_unknown_base_is_rejected() {
        let err = build(r#"{"knot": {"entity": "speed", "dimensions": [{"base": "nautical mile", "power": 1}]}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown unit 'nautical mile'"));
    }

    #[test]
    fn test_bad_prefix_is_rejected() {
        let err = build(r#"{"metre": {"entity": "length", "prefixes": ["Q"]}}"#).unwrap_err();
        assert!(err.to_string().contains("Given prefix 'Q' for unit 'metre' not supported"));
    }
}
