//! Per-language lexicon snapshots
//!
//! Building a lexicon and compiling its grammar is expensive, so each
//! language gets an immutable [`Snapshot`] that parse calls share through an
//! `Arc`. Changing the custom definitions bumps a generation counter; a
//! snapshot from an older generation is rebuilt on next use while calls
//! already holding it finish undisturbed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;
use quantex_core::QuantError;
use quantex_lexicon::{CustomDefinitions, LanguageData, Lexicon};
use quantex_plugin::{normalize_tag, LanguagePlugin};
use crate::dimensions::{DimensionEngine, UnitMemo};
use crate::grammar::Grammar;
use crate::values::ValuePatterns;

fn poisoned<T>(e: PoisonError<T>) -> QuantError {
    QuantError::construction(format!("Lock poisoned: {}", e))
}

/// Everything needed to parse one language, built against one generation
/// of custom definitions
pub struct Snapshot {
    pub lang: String,
    pub generation: u64,
    pub plugin: Arc<dyn LanguagePlugin>,
    pub lexicon: Lexicon,
    pub grammar: Grammar,
    pub values: ValuePatterns,
    memo: UnitMemo,
}

impl Snapshot {
    pub fn build(
        plugin: Arc<dyn LanguagePlugin>,
        custom: &CustomDefinitions,
        generation: u64,
    ) -> Result<Self, QuantError> {
        let lang = normalize_tag(plugin.meta().tag);
        let lexicon = load_lexicon(plugin.as_ref(), custom)?;
        let grammar = Grammar::build(plugin.tables(), &lexicon.units)?;
        let values = ValuePatterns::build(plugin.tables())?;
        debug!(lang = %lang, generation, units = lexicon.units.len(), "lexicon snapshot built");
        Ok(Self {
            lang,
            generation,
            plugin,
            lexicon,
            grammar,
            values,
            memo: UnitMemo::default(),
        })
    }

    pub fn dimensions(&self) -> DimensionEngine<'_> {
        DimensionEngine::new(&self.lexicon, self.plugin.as_ref(), &self.memo)
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("lang", &self.lang)
            .field("generation", &self.generation)
            .field("units", &self.lexicon.units.len())
            .finish()
    }
}

/// Lexicon of one language layered with `custom`
pub fn load_lexicon(plugin: &dyn LanguagePlugin, custom: &CustomDefinitions) -> Result<Lexicon, QuantError> {
    let lang = normalize_tag(plugin.meta().tag);
    let data = LanguageData {
        lang: &lang,
        units: plugin.unit_data(),
        entities: plugin.entity_data(),
    };
    Lexicon::load(data, custom)
}

/// Snapshot cache shared by every parse call of an engine
#[derive(Default)]
pub struct LexiconCache {
    generation: AtomicU64,
    custom: RwLock<CustomDefinitions>,
    snapshots: Mutex<HashMap<String, Arc<Snapshot>>>,
}

impl LexiconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot for a language, built on first use or when stale
    pub fn snapshot(&self, plugin: Arc<dyn LanguagePlugin>) -> Result<Arc<Snapshot>, QuantError> {
        let tag = normalize_tag(plugin.meta().tag);
        let mut snapshots = self.snapshots.lock().map_err(poisoned)?;
        let custom = self.custom.read().map_err(poisoned)?;
        let generation = self.generation.load(Ordering::Acquire);

        if let Some(snapshot) = snapshots.get(&tag) {
            if snapshot.generation == generation {
                return Ok(snapshot.clone());
            }
        }
        let snapshot = Arc::new(Snapshot::build(plugin, &custom, generation)?);
        snapshots.insert(tag, snapshot.clone());
        Ok(snapshot)
    }

    /// Change the custom definitions atomically.
    ///
    /// `change` works on a copy; the copy replaces the live definitions only
    /// if it returns `Ok`. Snapshots are invalidated only when something
    /// actually changed.
    pub fn modify<R, F>(&self, change: F) -> Result<R, QuantError>
    where
        F: FnOnce(&mut CustomDefinitions) -> Result<R, QuantError>,
    {
        let mut custom = self.custom.write().map_err(poisoned)?;
        let mut candidate = custom.clone();
        let result = change(&mut candidate)?;
        if candidate != *custom {
            *custom = candidate;
            let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            debug!(generation, "custom definitions changed");
        }
        Ok(result)
    }

    /// Copy of the live custom definitions
    pub fn custom(&self) -> Result<CustomDefinitions, QuantError> {
        Ok(self.custom.read().map_err(poisoned)?.clone())
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for LexiconCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexiconCache")
            .field("generation", &self.generation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantex_lang::en::English;
    use serde_json::json;

    fn english() -> Arc<dyn LanguagePlugin> {
        Arc::new(English::new())
    }

    #[test]
    fn test_snapshot_is_reused() {
        let cache = LexiconCache::new();
        let a = cache.snapshot(english()).unwrap();
        let b = cache.snapshot(english()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.lang, "en_us");
    }

    #[test]
    fn test_modify_rebuilds_snapshot() {
        let cache = LexiconCache::new();
        let before = cache.snapshot(english()).unwrap();
        cache
            .modify(|c| c.add_unit("schmeter", json!({"entity": "length", "surfaces": ["schmeter"]})))
            .unwrap();
        assert_eq!(cache.generation(), 1);
        let after = cache.snapshot(english()).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(after.lexicon.units.get("schmeter").is_some());
        assert!(before.lexicon.units.get("schmeter").is_none());
    }

    #[test]
    fn test_failed_modify_changes_nothing() {
        let cache = LexiconCache::new();
        let result: Result<(), QuantError> = cache.modify(|c| {
            c.add_unit("schmeter", json!({"entity": "length"}))?;
            Err(QuantError::construction("rejected"))
        });
        assert!(result.is_err());
        assert_eq!(cache.generation(), 0);
        assert!(cache.custom().unwrap().is_empty());
    }

    #[test]
    fn test_noop_modify_keeps_generation() {
        let cache = LexiconCache::new();
        let removed = cache.modify(|c| Ok(c.remove_unit("nothing"))).unwrap();
        assert!(!removed);
        assert_eq!(cache.generation(), 0);
    }
}
