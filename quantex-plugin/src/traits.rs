//! Language plugin trait

use quantex_core::{Dimensions, Quantity};
use serde::Serialize;
use crate::{LexicalTables, QuantityMatch, NumberRun, Substitution, BuildContext};

/// Metadata for a language plugin
#[derive(Debug, Clone, Serialize)]
pub struct LanguageMeta {
    /// Normalized tag ("en_us")
    pub tag: &'static str,
    pub name: &'static str,
    /// Other tags resolving to this language ("en", "en_gb")
    pub aliases: &'static [&'static str],
}

/// Language-specific lexicon and hooks consumed by the parser.
///
/// All hooks are synchronous and side-effect free.
pub trait LanguagePlugin: Send + Sync {
    fn meta(&self) -> LanguageMeta;

    fn tables(&self) -> &LexicalTables;

    /// Language unit table (JSON object keyed by unit name), usually surfaces only
    fn unit_data(&self) -> &str;

    /// Language entity table, if the language overrides any entity property
    fn entity_data(&self) -> Option<&str> {
        None
    }

    /// Language-specific cleanup. Must not change the byte length of the text.
    fn clean_text(&self, text: &str) -> String {
        text.to_string()
    }

    /// Convert number-word runs to digit strings, ordered by position
    fn extract_spelled_numbers(&self, text: &str, runs: &[NumberRun<'_>]) -> Vec<Substitution>;

    /// Split a captured unit token into its bare surface and signed power
    fn parse_unit_token(&self, matched: &QuantityMatch<'_>, token: &str, inverted: bool) -> (String, i32);

    /// Human-readable name of a unit composed from `dimensions`
    fn name_from_dimensions(&self, dimensions: &Dimensions) -> String;

    /// Apply language rules to a resolved quantity. `None` or an empty list drops the match.
    fn build_quantity(&self, ctx: &BuildContext<'_>, quantity: Quantity) -> Option<Vec<Quantity>> {
        let _ = ctx;
        Some(vec![quantity])
    }
}
