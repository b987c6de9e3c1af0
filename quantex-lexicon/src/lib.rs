//! Quantex Lexicon - unit and entity tables
//!
//! A `Lexicon` is built per language from three layers merged property by
//! property: the embedded language-neutral tables, the language's own unit
//! data (surfaces) and the runtime `CustomDefinitions`. Building expands
//! metric prefixes, validates references, indexes surfaces and symbols and
//! precomputes the derived-unit and derived-entity lookup tables.

mod defs;
mod prefixes;
mod si;
mod entities;
mod units;
mod custom;

pub use defs::{UnitDef, EntityDef, SiDef, RawTable, parse_table, merge_into};
pub use prefixes::{Prefix, METRIC_PREFIXES, BINARY_PREFIXES};
pub use si::SiRegistry;
pub use entities::Entities;
pub use units::Units;
pub use custom::CustomDefinitions;

use tracing::debug;
use quantex_core::QuantError;

static GENERAL_UNITS: &str = include_str!("../data/units.json");
static GENERAL_ENTITIES: &str = include_str!("../data/entities.json");

/// Language data handed to [`Lexicon::load`]
#[derive(Debug, Clone, Copy)]
pub struct LanguageData<'a> {
    pub lang: &'a str,
    pub units: &'a str,
    pub entities: Option<&'a str>,
}

/// Everything known about units and entities in one language
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub lang: String,
    pub entities: Entities,
    pub units: Units,
    pub si: SiRegistry,
}

impl Lexicon {
    pub fn load(data: LanguageData<'_>, custom: &CustomDefinitions) -> Result<Self, QuantError> {
        let mut entity_table = parse_table(GENERAL_ENTITIES, "entity")?;
        if let Some(lang_entities) = data.entities {
            merge_into(&mut entity_table, &parse_table(lang_entities, "entity")?);
        }
        merge_into(&mut entity_table, custom.entities());
        let entities = Entities::build(&entity_table)?;

        let mut unit_table = parse_table(GENERAL_UNITS, "unit")?;
        merge_into(&mut unit_table, &parse_table(data.units, "unit")?);
        merge_into(&mut unit_table, custom.units());

        let si = SiRegistry::standard()?;
        let units = Units::build(&unit_table, &entities, &si, data.lang)?;

        debug!(lang = data.lang, units = units.len(), entities = entities.len(), "lexicon built");
        Ok(Lexicon { lang: data.lang.to_string(), entities, units, si })
    }
}
