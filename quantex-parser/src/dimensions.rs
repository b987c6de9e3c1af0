//! Dimension engine
//!
//! Walks the unit segments of a match, turns every token into a
//! `{unit, power}` term and resolves the product to a unit. Known units come
//! back as the lexicon's own `Arc`, so every spelling of a unit shares one
//! instance and carries the dimensions its definition spelled. Synthetic
//! units are memoized per snapshot, keyed by the captured terms in order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use quantex_core::{
    Conversion, Dimension, DimensionKey, Dimensions, Entity, Unit, UNKNOWN_ENTITY, UNKNOWN_UNIT,
};
use quantex_lexicon::Lexicon;
use quantex_plugin::{LanguagePlugin, QuantityMatch};
use crate::disambiguate;
use crate::grammar::SEGMENTS;

/// Unit of one match plus adjustments to its value and surface
#[derive(Debug, Clone)]
pub struct UnitResolution {
    pub unit: Arc<Unit>,
    /// Bytes to drop from the end of the match when a unit chain was cut
    pub shortening: usize,
    /// Colloquial magnitude suffix ("5k" = 5 x 1000)
    pub multiplier: f64,
}

/// Synthetic units by captured `{base, power}` terms
pub type UnitMemo = Mutex<HashMap<Dimensions, Arc<Unit>>>;

pub struct DimensionEngine<'a> {
    lexicon: &'a Lexicon,
    plugin: &'a dyn LanguagePlugin,
    memo: &'a UnitMemo,
}

impl<'a> DimensionEngine<'a> {
    pub fn new(lexicon: &'a Lexicon, plugin: &'a dyn LanguagePlugin, memo: &'a UnitMemo) -> Self {
        DimensionEngine { lexicon, plugin, memo }
    }

    /// Resolve the unit of a match.
    ///
    /// Operators between units must agree: once a multiplication operator has
    /// been seen, a different one cuts the chain there. The first division
    /// operator puts every later unit in the denominator.
    pub fn unit_for_match(&self, matched: &QuantityMatch<'_>) -> UnitResolution {
        let tables = self.plugin.tables();
        let units = &self.lexicon.units;
        let mut captured = Dimensions::default();
        let mut multiplier = 1.0;
        let mut shortening = 0;
        let mut slash = false;
        // None until the first multiplication operator; Some(None) for adjacency
        let mut mult_op: Option<Option<&str>> = None;

        for index in 0..=SEGMENTS {
            let unit = matched.unit(index);
            let op = matched.operator(index).map(|t| t.text);
            let suffix = index == 1 && unit.is_some_and(|u| tables.suffix(u.text).is_some());

            let counts = match op {
                Some(o) => tables.is_multiplication_operator(o),
                None => unit.is_some() && !suffix,
            };
            let spaced_first = index == 1 && op.is_some_and(|o| o.chars().all(char::is_whitespace));
            if counts && mult_op != Some(op) && !spaced_first {
                if mult_op.is_none() {
                    mult_op = Some(op);
                } else {
                    let cut_at = if op.is_none() {
                        captured = Dimensions::new(
                            captured.terms()[..captured.len().saturating_sub(1)].to_vec(),
                        );
                        matched
                            .operator(index - 1)
                            .or_else(|| matched.unit(index - 1))
                            .map(|t| t.start)
                    } else {
                        matched.operator(index).map(|t| t.start)
                    };
                    if let Some(start) = cut_at {
                        shortening = matched.end.saturating_sub(start);
                    }
                    debug!(surface = matched.as_str(), shortening, "inconsistent operators, unit chain cut");
                    break;
                }
            }

            if op.is_some_and(|o| tables.is_division_operator(o)) {
                slash = true;
            }

            let Some(token) = unit else {
                continue;
            };

            if suffix && op.is_none() {
                let other_units = matched.prefix.is_some() || matched.unit(2).is_some();
                if other_units || !disambiguate::has_exact(units, token.text) {
                    if let Some(factor) = tables.suffix(token.text) {
                        multiplier *= factor;
                        continue;
                    }
                }
            }

            let (surface, power) = if disambiguate::unit_name(units, token.text).is_some() {
                (token.text.to_string(), if slash { -1 } else { 1 })
            } else {
                self.plugin.parse_unit_token(matched, token.text, slash)
            };
            let base = disambiguate::unit_name(units, &surface).unwrap_or(UNKNOWN_UNIT);
            captured.push(Dimension::new(base, power));
        }

        let unit = self.resolve(captured);
        UnitResolution { unit, shortening, multiplier }
    }

    /// Unit for captured dimensions
    pub fn resolve(&self, captured: Dimensions) -> Arc<Unit> {
        if let Some(unit) = self.lookup(&captured) {
            return unit;
        }
        match self.memo.lock() {
            Ok(mut memo) => {
                if let Some(unit) = memo.get(&captured) {
                    return unit.clone();
                }
                let unit = Arc::new(self.synthesize(&captured));
                memo.insert(captured, unit.clone());
                unit
            }
            Err(e) => {
                warn!(error = %e, "unit memo poisoned, resolving without it");
                Arc::new(self.synthesize(&captured))
            }
        }
    }

    /// Shared lexicon unit for captured dimensions: a sentinel, or the first
    /// unit indexed under the canonical key, then under the expanded key
    fn lookup(&self, captured: &Dimensions) -> Option<Arc<Unit>> {
        let units = &self.lexicon.units;
        if captured.iter().any(|term| term.base == UNKNOWN_UNIT) {
            debug!(dimensions = %captured, "unresolved unit token");
            return Some(units.unknown().clone());
        }
        let canonical = captured.canonical();
        if canonical.is_empty() {
            return Some(units.dimensionless().clone());
        }
        units
            .derived(&canonical.key())
            .first()
            .or_else(|| {
                let expanded = self.expand(&canonical)?;
                units.derived(&expanded.key()).first()
            })
            .cloned()
    }

    fn synthesize(&self, captured: &Dimensions) -> Unit {
        let canonical = captured.canonical();
        let name = self.plugin.name_from_dimensions(&appearance_order(captured));
        let conversion = self.compose_conversion(&canonical);
        let entity = self.infer_entity(&canonical);
        debug!(unit = %name, entity = %entity.name, "synthetic unit");

        let mut unit = Unit::new(name, entity, canonical, conversion, self.lexicon.lang.as_str());
        unit.original_dimensions = Some(captured.clone());
        unit
    }

    /// Product of the component units' base-unit expansions
    fn expand(&self, dims: &Dimensions) -> Option<Dimensions> {
        let mut out = Dimensions::default();
        for term in dims {
            let full = self.lexicon.units.expanded(&term.base)?;
            out = out.multiply(&full.power(term.power));
        }
        Some(out)
    }

    fn compose_conversion(&self, dims: &Dimensions) -> Option<Conversion> {
        let mut parts = Vec::with_capacity(dims.len());
        for term in dims {
            let conversion = self.lexicon.units.get(&term.base)?.conversion.as_ref()?;
            parts.push((conversion, term.power));
        }
        self.lexicon.si.compose(parts)
    }

    /// Entity for canonical unit dimensions.
    ///
    /// Each unit is replaced by its entity; an entity raised to a power that
    /// is itself a named entity (length² = area) is folded first. The folded
    /// vector is then looked up as defined, then fully expanded.
    fn infer_entity(&self, dims: &Dimensions) -> Arc<Entity> {
        let entities = &self.lexicon.entities;
        let raw: Dimensions = dims
            .iter()
            .map(|term| {
                let entity = self
                    .lexicon
                    .units
                    .get(&term.base)
                    .map_or(UNKNOWN_ENTITY, |u| u.entity.name.as_str());
                Dimension::new(entity, term.power)
            })
            .collect();

        let folded: Dimensions = raw
            .iter()
            .map(|term| {
                match disambiguate::entity(entities, &DimensionKey::single(term.base.as_str(), term.power.abs())) {
                    Some(entity) => Dimension::new(entity.name.as_str(), term.power.signum()),
                    None => term.clone(),
                }
            })
            .collect::<Dimensions>()
            .canonical();

        if let [single] = folded.terms() {
            if single.power == 1 {
                if let Some(entity) = entities.get(&single.base) {
                    return entity.clone();
                }
            }
        }

        let by_expansion = || {
            let mut expanded = Dimensions::default();
            for term in &folded {
                let full = entities.expanded(&term.base)?;
                expanded = expanded.multiply(&full.power(term.power));
            }
            disambiguate::entity(entities, &expanded.key())
        };
        disambiguate::entity(entities, &folded.key())
            .or_else(by_expansion)
            .unwrap_or_else(|| Arc::new(Entity::unknown(raw.canonical())))
    }
}

/// Merge repeated bases keeping first-appearance order, dropping zero powers
fn appearance_order(dims: &Dimensions) -> Dimensions {
    let mut merged: Vec<Dimension> = Vec::with_capacity(dims.len());
    for term in dims {
        match merged.iter_mut().find(|d| d.base == term.base) {
            Some(existing) => existing.power += term.power,
            None => merged.push(Dimension::new(term.base.as_str(), term.power)),
        }
    }
    merged.into_iter().filter(|d| d.power != 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::testing::english_lexicon;
    use quantex_lang::en::English;

    fn resolve(text: &str) -> UnitResolution {
        let lexicon = english_lexicon();
        let plugin = English::new();
        let grammar = Grammar::build(plugin.tables(), &lexicon.units).unwrap();
        let memo = UnitMemo::default();
        let engine = DimensionEngine::new(&lexicon, &plugin, &memo);
        let matches = grammar.quantities(text);
        engine.unit_for_match(&matches[0])
    }

    #[test]
    fn test_known_compound_unit() {
        let r = resolve("12 km/h");
        assert_eq!(r.unit.name, "kilometre per hour");
        assert_eq!(r.unit.entity.name, "speed");
        assert_eq!(r.shortening, 0);
    }

    #[test]
    fn test_known_units_are_lexicon_instances() {
        let lexicon = english_lexicon();
        let plugin = English::new();
        let grammar = Grammar::build(plugin.tables(), &lexicon.units).unwrap();
        let memo = UnitMemo::default();
        let engine = DimensionEngine::new(&lexicon, &plugin, &memo);
        let shared = lexicon.units.get("kilometre per hour").unwrap();
        for text in ["12 km/h", "12 kph", "12 kilometres per hour", "12 KM/H"] {
            let matches = grammar.quantities(text);
            let unit = engine.unit_for_match(&matches[0]).unit;
            assert!(Arc::ptr_eq(&unit, shared), "{}", text);
        }
        assert!(memo.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unresolved_token_is_unknown() {
        let r = resolve("5 cubic m³");
        assert!(r.unit.is_unknown());
        assert_eq!(r.unit.entity.name, UNKNOWN_ENTITY);
        assert!(resolve("5 square ft squared").unit.is_unknown());
    }

    #[test]
    fn test_space_joined_units() {
        assert_eq!(resolve("3 N m").unit.name, "newton metre");
        assert_eq!(resolve("1 kilowatt hour").unit.name, "kilowatt hour");
    }

    #[test]
    fn test_superscript_power() {
        assert_eq!(resolve("20 m²").unit.name, "square metre");
    }

    #[test]
    fn test_synthetic_unit() {
        let r = resolve("5 mi²");
        assert_eq!(r.unit.name, "square mile");
        assert_eq!(r.unit.entity.name, "area");
        let c = r.unit.conversion.as_ref().unwrap();
        assert_eq!(c.si_label, "square metre");
        assert!((c.factor - 1609.344f64.powi(2)).abs() < 1e-6);
    }

    #[test]
    fn test_currency_rate() {
        let r = resolve("$20/h");
        assert_eq!(r.unit.name, "dollar per hour");
        assert_eq!(r.unit.dimensions, Dimensions::new(vec![
            Dimension::new("dollar", 1),
            Dimension::new("hour", -1),
        ]));
    }

    #[test]
    fn test_magnitude_suffix() {
        let r = resolve("5k miles");
        assert_eq!(r.multiplier, 1000.0);
        assert_eq!(r.unit.name, "mile");
    }

    #[test]
    fn test_bare_number() {
        let r = resolve("42");
        assert!(r.unit.is_dimensionless());
        assert_eq!(r.multiplier, 1.0);
    }

    #[test]
    fn test_memo_identity() {
        let lexicon = english_lexicon();
        let plugin = English::new();
        let memo = UnitMemo::default();
        let engine = DimensionEngine::new(&lexicon, &plugin, &memo);
        let dims = || Dimensions::new(vec![Dimension::new("mile", 2)]);
        let a = engine.resolve(dims());
        let b = engine.resolve(dims());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.original_dimensions, Some(dims()));
        assert_eq!(memo.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_appearance_order() {
        let dims = Dimensions::new(vec![
            Dimension::new("second", -1),
            Dimension::new("metre", 1),
            Dimension::new("second", -1),
        ]);
        let merged = appearance_order(&dims);
        assert_eq!(merged.terms()[0], Dimension::new("second", -2));
        assert_eq!(merged.terms()[1], Dimension::new("metre", 1));
    }
}
