//! Quantex - quantities in natural-language text
//!
//! ```ignore
//! let found = quantex::parse("I drove 12 km/h", quantex::DEFAULT_LANG)?;
//! assert_eq!(found[0].unit.name, "kilometre per hour");
//! ```
//!
//! The free functions share one process-wide [`Quantex`] engine with every
//! bundled language. Build your own engine with [`Quantex::new`] to use a
//! different language registry.

pub use quantex_core::{
    codes, Conversion, Dimension, DimensionKey, Dimensions, Entity, QuantError, Quantity, Unit,
    DIMENSIONLESS, UNKNOWN_ENTITY, UNKNOWN_UNIT,
};
pub use quantex_plugin::{LanguageMeta, LanguagePlugin, LanguageRegistry, LexicalTables};
pub use quantex_lexicon::CustomDefinitions;
pub use quantex_parser::{Quantex, Snapshot};
pub use quantex_lang::{load_standard_languages, standard_registry};

use std::sync::OnceLock;
use serde_json::Value;

/// Language used when the caller has no preference
pub const DEFAULT_LANG: &str = "en_US";

/// Shared engine behind the free functions
pub fn engine() -> &'static Quantex {
    static ENGINE: OnceLock<Quantex> = OnceLock::new();
    ENGINE.get_or_init(Quantex::with_standard_languages)
}

/// Every quantity mentioned in `text`
pub fn parse(text: &str, lang: &str) -> Result<Vec<Quantity>, QuantError> {
    engine().parse(text, lang)
}

/// `text` with " {quantity}" inserted after every mention
pub fn inline_parse(text: &str, lang: &str) -> Result<String, QuantError> {
    engine().inline_parse(text, lang)
}

pub fn add_custom_unit(name: &str, props: Value) -> Result<(), QuantError> {
    engine().add_custom_unit(name, props)
}

pub fn remove_custom_unit(name: &str) -> Result<bool, QuantError> {
    engine().remove_custom_unit(name)
}

pub fn add_custom_entity(name: &str, props: Value) -> Result<(), QuantError> {
    engine().add_custom_entity(name, props)
}

pub fn remove_custom_entity(name: &str) -> Result<bool, QuantError> {
    engine().remove_custom_entity(name)
}

pub mod prelude {
    pub use crate::{parse, inline_parse, Quantex, Quantity, Unit, Entity, QuantError, DEFAULT_LANG};
}
