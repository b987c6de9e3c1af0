//! Runtime custom unit and entity definitions

use serde_json::Value;
use quantex_core::QuantError;
use crate::defs::RawTable;

/// Custom entries layered over the built-in tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomDefinitions {
    units: RawTable,
    entities: RawTable,
}

impl CustomDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or extend a unit. `props` must be a JSON object of unit properties
    /// (`entity`, `surfaces`, `symbols`, `dimensions`, `conversion`, ...).
    pub fn add_unit(&mut self, name: &str, props: Value) -> Result<(), QuantError> {
        merge_props(&mut self.units, name, props)
    }

    /// Remove a custom unit; built-in units are unaffected
    pub fn remove_unit(&mut self, name: &str) -> bool {
        self.units.remove(name).is_some()
    }

    pub fn add_entity(&mut self, name: &str, props: Value) -> Result<(), QuantError> {
        merge_props(&mut self.entities, name, props)
    }

    pub fn remove_entity(&mut self, name: &str) -> bool {
        self.entities.remove(name).is_some()
    }

    pub fn units(&self) -> &RawTable {
        &self.units
    }

    pub fn entities(&self) -> &RawTable {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.entities.is_empty()
    }
}

fn merge_props(table: &mut RawTable, name: &str, props: Value) -> Result<(), QuantError> {
    let Value::Object(map) = props else {
        return Err(QuantError::construction(format!(
            "Properties for custom definition '{}' must be a JSON object", name
        )));
    };
    let entry = table.entry(name.to_string()).or_default();
    entry.extend(map);
    Ok(())
}
