//! Vietnamese language pack

pub(crate) mod tables;
mod numbers;
mod parser;

use quantex_core::{Dimensions, Quantity};
use quantex_plugin::{
    BuildContext, LanguageMeta, LanguagePlugin, LexicalTables, NumberRun, QuantityMatch, Substitution,
};

static UNIT_DATA: &str = include_str!("../../data/vi/units.json");

/// Vietnamese (`vi_vn`, also `vi`)
pub struct Vietnamese {
    tables: LexicalTables,
}

impl Vietnamese {
    pub fn new() -> Self {
        Vietnamese { tables: tables::tables() }
    }
}

impl Default for Vietnamese {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguagePlugin for Vietnamese {
    fn meta(&self) -> LanguageMeta {
        LanguageMeta {
            tag: "vi_vn",
            name: "Vietnamese",
            aliases: &["vi", "vietnamese"],
        }
    }

    fn tables(&self) -> &LexicalTables {
        &self.tables
    }

    fn unit_data(&self) -> &str {
        UNIT_DATA
    }

    fn clean_text(&self, text: &str) -> String {
        crate::tokens::clean_text(text)
    }

    fn extract_spelled_numbers(&self, _text: &str, runs: &[NumberRun<'_>]) -> Vec<Substitution> {
        numbers::extract(&self.tables, runs)
    }

    fn parse_unit_token(&self, _matched: &QuantityMatch<'_>, token: &str, inverted: bool) -> (String, i32) {
        crate::tokens::parse_unit_token(&self.tables, token, inverted)
    }

    fn name_from_dimensions(&self, dimensions: &Dimensions) -> String {
        parser::name_from_dimensions(dimensions)
    }

    fn build_quantity(&self, ctx: &BuildContext<'_>, quantity: Quantity) -> Option<Vec<Quantity>> {
        parser::build_quantity(ctx, quantity)
    }
}
