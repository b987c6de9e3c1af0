//! Entity table with derived-entity lookup

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;
use quantex_core::{DimensionKey, Dimensions, Entity, QuantError, UNKNOWN_ENTITY};
use crate::defs::{decode, EntityDef, RawTable};

/// Loaded entities for one language
#[derive(Debug, Clone)]
pub struct Entities {
    names: BTreeMap<String, Arc<Entity>>,
    /// Entity dimensions expanded down to base entities
    expanded: HashMap<String, Dimensions>,
    /// Candidates per dimension key, sorted by name
    derived: HashMap<DimensionKey, Vec<Arc<Entity>>>,
}

impl Entities {
    pub fn build(table: &RawTable) -> Result<Self, QuantError> {
        let mut defs: BTreeMap<String, EntityDef> = BTreeMap::new();
        for (name, props) in table {
            defs.insert(name.clone(), decode(name, props, "entity")?);
        }
        defs.entry(UNKNOWN_ENTITY.to_string()).or_default();

        for (name, def) in &defs {
            for term in &def.dimensions {
                if !defs.contains_key(&term.base) {
                    return Err(QuantError::construction(format!(
                        "Entity '{}' refers to unknown entity '{}'", name, term.base
                    )));
                }
            }
        }

        let mut expanded = HashMap::new();
        for name in defs.keys() {
            let mut stack = Vec::new();
            let dims = expand(name, &defs, &mut stack)?;
            expanded.insert(name.clone(), dims);
        }

        let names: BTreeMap<String, Arc<Entity>> = defs
            .into_iter()
            .map(|(name, def)| {
                let entity = Entity::new(name.clone(), def.dimensions, def.uri);
                (name, Arc::new(entity))
            })
            .collect();

        let mut derived: HashMap<DimensionKey, Vec<Arc<Entity>>> = HashMap::new();
        for entity in names.values() {
            if entity.dimensions.is_empty() {
                continue;
            }
            let mut keys = vec![entity.dimensions.key()];
            if let Some(full) = expanded.get(&entity.name) {
                keys.push(full.key());
            }
            keys.dedup();
            for key in keys {
                derived.entry(key).or_default().push(entity.clone());
            }
        }
        for candidates in derived.values_mut() {
            candidates.sort_by(|a, b| a.name.cmp(&b.name));
            candidates.dedup_by(|a, b| a.name == b.name);
        }

        debug!(entities = names.len(), derived = derived.len(), "entities loaded");
        Ok(Entities { names, expanded, derived })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Entity>> {
        self.names.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(|s| s.as_str())
    }

    /// Entities whose defined or expanded dimensions have this key, alphabetically
    pub fn derived(&self, key: &DimensionKey) -> &[Arc<Entity>] {
        self.derived.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Dimensions of an entity in terms of base entities
    pub fn expanded(&self, name: &str) -> Option<&Dimensions> {
        self.expanded.get(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn expand(name: &str, defs: &BTreeMap<String, EntityDef>, stack: &mut Vec<String>) -> Result<Dimensions, QuantError> {
    let def = defs
        .get(name)
        .ok_or_else(|| QuantError::construction(format!("Unknown entity '{}'", name)))?;
    if def.dimensions.is_empty() {
        return Ok(Dimensions::plain(name));
    }
    if stack.iter().any(|s| s == name) {
        return Err(QuantError::construction(format!(
            "Cyclic entity definition: {} -> {}", stack.join(" -> "), name
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::parse_table;
    use quantex_core::Dimension;

    fn entities() -> Entities {
        let table = parse_table(
            r#"{
                "length": {},
                "time": {},
                "mass": {},
                "volume": {"dimensions": [{"base": "length", "power": 3}]},
                "speed": {"dimensions": [{"base": "length", "power": 1}, {"base": "time", "power": -1}]},
                "acceleration": {"dimensions": [{"base": "speed", "power": 1}, {"base": "time", "power": -1}]},
                "density": {"dimensions": [{"base": "mass", "power": 1}, {"base": "volume", "power": -1}]}
            }"#,
            "entity",
        )
        .unwrap();
        Entities::build(&table).unwrap()
    }

    fn key(terms: &[(&str, i32)]) -> DimensionKey {
        terms.iter().map(|(b, p)| Dimension::new(*b, *p)).collect::<Dimensions>().key()
    }

    #[test]
    fn test_unknown_is_injected() {
        assert!(entities().contains(UNKNOWN_ENTITY));
    }

    #[test]
    fn test_derived_by_defined_and_expanded_key() {
        let e = entities();
        let by_defined = e.derived(&key(&[("speed", 1), ("time", -1)]));
        assert_eq!(by_defined[0].name, "acceleration");
        let by_expanded = e.derived(&key(&[("length", 1), ("time", -2)]));
        assert_eq!(by_expanded[0].name, "acceleration");
        let density = e.derived(&key(&[("length", -3), ("mass", 1)]));
        assert_eq!(density[0].name, "density");
        assert!(e.derived(&key(&[("length", 1)])).is_empty());
    }

    #[test]
    fn test_expanded() {
        let e = entities();
        assert_eq!(e.expanded("length"), Some(&Dimensions::plain("length")));
        assert_eq!(e.expanded("density").map(|d| d.key()), Some(key(&[("length", -3), ("mass", 1)])));
    }

    #[test]
    fn test_unknown_base_is_rejected() {
        let table = parse_table(r#"{"speed": {"dimensions": [{"base": "length", "power": 1}]}}"#, "entity").unwrap();
        assert!(matches!(Entities::build(&table), Err(QuantError::Construction(_))));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let table = parse_table(
            r#"{
                "a": {"dimensions": [{"base": "b", "power": 1}]},
                "b": {"dimensions": [{"base": "a", "power": 2}]}
            }"#,
            "entity",
        )
        .unwrap();
        let err = Entities::build(&table).unwrap_err();
        assert!(err.to_string().contains("Cyclic"));
    }
}
