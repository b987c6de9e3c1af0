//! Quantex Plugin System
//!
//! A language is a `LanguagePlugin`: lexical tables, unit surface data and a
//! handful of hooks (spelled numbers, unit tokens, unit naming, final quantity
//! rules). Languages are selected through a `LanguageRegistry`.

mod traits;
mod registry;
mod tables;
mod matched;

pub use traits::{LanguagePlugin, LanguageMeta};
pub use registry::{LanguageRegistry, normalize_tag};
pub use tables::{
    LexicalTables, NumberWord,
    SUPERSCRIPTS, SUPERSCRIPT_MINUS, VULGAR_FRACTIONS,
    normalize_superscripts, is_superscript, vulgar_fraction,
};
pub use matched::{Token, NumberRun, UnitSegment, QuantityMatch, Substitution, BuildContext};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        LanguagePlugin, LanguageMeta, LanguageRegistry, LexicalTables, NumberWord,
        Token, NumberRun, UnitSegment, QuantityMatch, Substitution, BuildContext,
    };
    pub use quantex_core::prelude::*;
}
