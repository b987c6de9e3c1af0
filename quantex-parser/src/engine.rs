//! Quantex engine: language selection, parsing and custom definitions

use std::sync::Arc;
use serde_json::Value;
use tracing::debug;
use quantex_core::{QuantError, Quantity};
use quantex_lexicon::CustomDefinitions;
use quantex_plugin::LanguageRegistry;
use crate::assemble;
use crate::cache::{load_lexicon, LexiconCache, Snapshot};

/// Main Quantex engine
pub struct Quantex {
    registry: LanguageRegistry,
    cache: LexiconCache,
}

impl Quantex {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self {
            registry,
            cache: LexiconCache::new(),
        }
    }

    pub fn with_standard_languages() -> Self {
        Self::new(quantex_lang::standard_registry())
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Lexicon snapshot for a language tag ("en_US", "en", "en-GB")
    pub fn snapshot(&self, lang: &str) -> Result<Arc<Snapshot>, QuantError> {
        let plugin = self.registry.get(lang)?;
        self.cache.snapshot(plugin)
    }

    /// Every quantity mentioned in `text`, in order of appearance.
    ///
    /// Matches whose value cannot be read are skipped; only lexicon and
    /// language errors fail the call.
    pub fn parse(&self, text: &str, lang: &str) -> Result<Vec<Quantity>, QuantError> {
        let snapshot = self.snapshot(lang)?;
        let quantities = assemble::extract(&snapshot, text);
        debug!(lang = %snapshot.lang, found = quantities.len(), "parsed");
        Ok(quantities)
    }

    /// `text` with " {quantity}" inserted after every mention
    pub fn inline_parse(&self, text: &str, lang: &str) -> Result<String, QuantError> {
        let mut quantities = self.parse(text, lang)?;
        quantities.sort_by_key(|q| q.span);

        let mut out = text.to_string();
        let mut shift = 0;
        for quantity in &quantities {
            let insert = format!(" {{{}}}", quantity);
            out.insert_str(quantity.span.1 + shift, &insert);
            shift += insert.len();
        }
        Ok(out)
    }

    /// Add or extend a custom unit in every language.
    ///
    /// The definition is checked against each registered language before it
    /// is accepted; on error nothing changes.
    pub fn add_custom_unit(&self, name: &str, props: Value) -> Result<(), QuantError> {
        self.cache.modify(|custom| {
            custom.add_unit(name, props)?;
            self.validate(custom)
        })
    }

    /// Remove a custom unit. Returns false if there was none with that name.
    pub fn remove_custom_unit(&self, name: &str) -> Result<bool, QuantError> {
        self.cache.modify(|custom| {
            let removed = custom.remove_unit(name);
            if removed {
                self.validate(custom)?;
            }
            Ok(removed)
        })
    }

    pub fn add_custom_entity(&self, name: &str, props: Value) -> Result<(), QuantError> {
        self.cache.modify(|custom| {
            custom.add_entity(name, props)?;
            self.validate(custom)
        })
    }

    pub fn remove_custom_entity(&self, name: &str) -> Result<bool, QuantError> {
        self.cache.modify(|custom| {
            let removed = custom.remove_entity(name);
            if removed {
                self.validate(custom)?;
            }
            Ok(removed)
        })
    }

    /// Copy of the custom definitions in effect
    pub fn custom_definitions(&self) -> Result<CustomDefinitions, QuantError> {
        self.cache.custom()
    }

    fn validate(&self, custom: &CustomDefinitions) -> Result<(), QuantError> {
        for meta in self.registry.languages() {
            let plugin = self.registry.get(meta.tag)?;
            load_lexicon(plugin.as_ref(), custom)?;
        }
        Ok(())
    }
}

impl Default for Quantex {
    fn default() -> Self {
        Self::with_standard_languages()
    }
}

impl std::fmt::Debug for Quantex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Quantex")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .finish()
    }
}
