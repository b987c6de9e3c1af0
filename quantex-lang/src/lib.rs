//! Quantex language packs
//!
//! Each language implements `LanguagePlugin`. `standard_registry()` returns a
//! registry holding every language shipped here.

pub mod en;
pub mod vi;
mod tokens;

use quantex_plugin::LanguageRegistry;

/// Add the bundled languages to a registry
pub fn load_standard_languages(registry: LanguageRegistry) -> LanguageRegistry {
    registry
        .with_language(en::English::new())
        .with_language(vi::Vietnamese::new())
}

/// Registry with every bundled language
pub fn standard_registry() -> LanguageRegistry {
    load_standard_languages(LanguageRegistry::new())
}
