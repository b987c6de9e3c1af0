//! Language registry

use crate::{LanguagePlugin, LanguageMeta};
use quantex_core::QuantError;
use std::collections::HashMap;
use std::sync::Arc;

/// Lowercase a language tag and turn whitespace and `-` into `_` ("en-US" -> "en_us")
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Lookup table from language tag to plugin, built once at startup
#[derive(Clone, Default)]
pub struct LanguageRegistry {
    languages: HashMap<String, Arc<dyn LanguagePlugin>>,
    aliases: HashMap<String, String>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self {
            languages: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn with_language<L: LanguagePlugin + 'static>(mut self, lang: L) -> Self {
        let meta = lang.meta();
        let tag = normalize_tag(meta.tag);
        for alias in meta.aliases {
            self.aliases.insert(normalize_tag(alias), tag.clone());
        }
        self.languages.insert(tag, Arc::new(lang));
        self
    }

    /// Resolve a tag: exact, then alias, then the two-letter language prefix
    pub fn get(&self, tag: &str) -> Result<Arc<dyn LanguagePlugin>, QuantError> {
        let normalized = normalize_tag(tag);
        if let Some(plugin) = self.languages.get(&normalized) {
            return Ok(plugin.clone());
        }
        if let Some(plugin) = self.aliases.get(&normalized).and_then(|t| self.languages.get(t)) {
            return Ok(plugin.clone());
        }
        let short: String = normalized.chars().take(2).collect();
        if short.len() == 2 {
            let found = self
                .languages
                .iter()
                .filter(|(t, _)| t.starts_with(&short))
                .min_by(|a, b| a.0.cmp(b.0))
                .map(|(_, p)| p.clone())
                .or_else(|| self.aliases.get(&short).and_then(|t| self.languages.get(t)).cloned());
            if let Some(plugin) = found {
                return Ok(plugin);
            }
        }
        Err(QuantError::UnsupportedLanguage(tag.to_string()))
    }

    /// Canonical tag a request resolves to
    pub fn resolve_tag(&self, tag: &str) -> Result<String, QuantError> {
        self.get(tag).map(|p| normalize_tag(p.meta().tag))
    }

    pub fn languages(&self) -> Vec<LanguageMeta> {
        let mut metas: Vec<LanguageMeta> = self.languages.values().map(|p| p.meta()).collect();
        metas.sort_by(|a, b| a.tag.cmp(b.tag));
        metas
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl std::fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<&String> = self.languages.keys().collect();
        tags.sort();
        f.debug_struct("LanguageRegistry").field("languages", &tags).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LexicalTables, NumberRun, QuantityMatch, Substitution};
    use quantex_core::Dimensions;

    struct Dummy {
        tables: LexicalTables,
    }

    impl LanguagePlugin for Dummy {
        fn meta(&self) -> LanguageMeta {
            LanguageMeta { tag: "en_US", name: "English", aliases: &["en", "en-GB"] }
        }
        fn tables(&self) -> &LexicalTables {
            &self.tables
        }
        fn unit_data(&self) -> &str {
            "{}"
        }
        fn extract_spelled_numbers(&self, _text: &str, _runs: &[NumberRun<'_>]) -> Vec<Substitution> {
            Vec::new()
        }
        fn parse_unit_token(&self, _m: &QuantityMatch<'_>, token: &str, inverted: bool) -> (String, i32) {
            (token.to_string(), if inverted { -1 } else { 1 })
        }
        fn name_from_dimensions(&self, dimensions: &Dimensions) -> String {
            dimensions.to_string()
        }
    }

    fn registry() -> LanguageRegistry {
        LanguageRegistry::new().with_language(Dummy { tables: LexicalTables::default() })
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag(" en-US "), "en_us");
        assert_eq!(normalize_tag("EN us"), "en_us");
    }

    #[test]
    fn test_lookup() {
        let reg = registry();
        assert_eq!(reg.len(), 1);
        assert!(reg.get("en_US").is_ok());
        assert!(reg.get("en-gb").is_ok());
        assert!(reg.get("EN").is_ok());
        assert!(reg.get("en_AU").is_ok());
        assert_eq!(reg.resolve_tag("en").unwrap(), "en_us");
    }

    #[test]
    fn test_unsupported() {
        let err = registry().get("fr_FR").err().unwrap();
        assert_eq!(err, QuantError::UnsupportedLanguage("fr_FR".to_string()));
        assert!(LanguageRegistry::new().get("e").is_err());
    }
}
