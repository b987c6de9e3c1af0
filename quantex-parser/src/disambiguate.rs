//! Deterministic choice among units or entities sharing a surface or key

use std::collections::BTreeSet;
use std::sync::Arc;
use quantex_core::{DimensionKey, Entity};
use quantex_lexicon::{Entities, Units};

/// Unit name for a surface. Exact symbol, exact surface, lowercased surface
/// and lowercased symbol are tried in that order; the first tier with any
/// candidate wins and its alphabetically first name is returned.
pub fn unit_name<'u>(units: &'u Units, surface: &str) -> Option<&'u str> {
    let lower = surface.to_lowercase();
    let tiers: [Option<&BTreeSet<String>>; 4] = [
        units.by_symbol(surface),
        units.by_surface(surface),
        units.by_surface_lower(&lower),
        units.by_symbol_lower(&lower),
    ];
    tiers
        .into_iter()
        .flatten()
        .find(|names| !names.is_empty())
        .and_then(|names| names.iter().next())
        .map(|name| name.as_str())
}

/// True if `token` is spelled exactly as some unit's symbol or surface
pub fn has_exact(units: &Units, token: &str) -> bool {
    units.by_symbol(token).is_some_and(|n| !n.is_empty()) || units.by_surface(token).is_some_and(|n| !n.is_empty())
}

/// Entity for a derived dimension key; alphabetically first candidate
pub fn entity(entities: &Entities, key: &DimensionKey) -> Option<Arc<Entity>> {
    entities.derived(key).first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::english_lexicon;

    #[test]
    fn test_symbol_beats_surface() {
        let lex = english_lexicon();
        assert_eq!(unit_name(&lex.units, "km"), Some("kilometre"));
        assert_eq!(unit_name(&lex.units, "kilometres"), Some("kilometre"));
    }

    #[test]
    fn test_case_folding_tiers() {
        let lex = english_lexicon();
        assert_eq!(unit_name(&lex.units, "Kilometres"), Some("kilometre"));
        assert_eq!(unit_name(&lex.units, "no such thing"), None);
    }

    #[test]
    fn test_shared_surface_is_deterministic() {
        let lex = english_lexicon();
        let first = unit_name(&lex.units, "pound");
        for _ in 0..5 {
            assert_eq!(unit_name(&lex.units, "pound"), first);
        }
        assert_eq!(first, Some("pound"));
    }

    #[test]
    fn test_has_exact() {
        let lex = english_lexicon();
        assert!(has_exact(&lex.units, "km"));
        assert!(!has_exact(&lex.units, "KM"));
    }

    #[test]
    fn test_entity_for_speed() {
        let lex = english_lexicon();
        let key = quantex_core::Dimensions::new(vec![
            quantex_core::Dimension::new("length", 1),
            quantex_core::Dimension::new("time", -1),
        ])
        .key();
        assert_eq!(entity(&lex.entities, &key).map(|e| e.name.clone()).as_deref(), Some("speed"));
    }
}
