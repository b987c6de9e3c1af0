//! Quantex Parser - finds quantities in text
//!
//! Pipeline for one call: prepare the text (clean, substitute spelled
//! numbers), match the language grammar, then per match resolve the value,
//! resolve the unit and let the language apply its final rules. Lexicons and
//! compiled grammars live in per-language snapshots shared across calls.

mod grammar;
mod values;
mod disambiguate;
mod dimensions;
mod assemble;
mod cache;
mod engine;

pub use grammar::{alternation, number_pattern, quantity_pattern, range_pattern, Grammar, SEGMENTS};
pub use values::{ResolvedValue, ValuePatterns};
pub use disambiguate::{entity as disambiguate_entity, unit_name as disambiguate_unit};
pub use dimensions::{DimensionEngine, UnitMemo, UnitResolution};
pub use assemble::{extract, is_quote_artifact, OffsetMap, PreparedText};
pub use cache::{LexiconCache, Snapshot};
pub use engine::Quantex;

#[cfg(test)]
pub(crate) mod testing {
    use quantex_lang::en::English;
    use quantex_lexicon::{CustomDefinitions, Lexicon};
    use crate::cache::load_lexicon;

    pub fn english_lexicon() -> Lexicon {
        load_lexicon(&English::new(), &CustomDefinitions::new()).unwrap()
    }
}
