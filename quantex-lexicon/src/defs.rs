//! Serialized table entries and property-wise merging of table sources

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};
use quantex_core::{Conversion, Dimensions, QuantError};

/// Raw table: entry name to its property object
pub type RawTable = BTreeMap<String, Map<String, Value>>;

/// Unit entry as found in a units table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitDef {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub surfaces: Vec<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub conversion: Option<Conversion>,
    /// Prefix symbols to expand ("k", "Mi")
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default, rename = "URI")]
    pub uri: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// Entity entry as found in an entities table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default, rename = "URI")]
    pub uri: Option<String>,
}

/// Named SI unit with its dimensions in SI base units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiDef {
    pub name: String,
    pub dimensions: Dimensions,
}

/// Parse a JSON table source into raw entries
pub fn parse_table(source: &str, what: &str) -> Result<RawTable, QuantError> {
    let value: Value = serde_json::from_str(source)
        .map_err(|e| QuantError::construction(format!("Invalid {} table: {}", what, e)))?;
    let Value::Object(entries) = value else {
        return Err(QuantError::construction(format!("{} table must be a JSON object", what)));
    };
    let mut table = RawTable::new();
    for (name, props) in entries {
        match props {
            Value::Object(map) => {
                table.insert(name, map);
            }
            _ => {
                return Err(QuantError::construction(format!(
                    "Entry '{}' in {} table must be an object", name, what
                )))
            }
        }
    }
    Ok(table)
}

/// Overlay `layer` onto `base`, property by property
pub fn merge_into(base: &mut RawTable, layer: &RawTable) {
    for (name, props) in layer {
        let entry = base.entry(name.clone()).or_default();
        for (key, value) in props {
            entry.insert(key.clone(), value.clone());
        }
    }
}

/// Deserialize one raw entry
pub fn decode<T: for<'de> Deserialize<'de>>(name: &str, props: &Map<String, Value>, what: &str) -> Result<T, QuantError> {
    serde_json::from_value(Value::Object(props.clone()))
        .map_err(|e| QuantError::construction(format!("Invalid {} '{}': {}", what, name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_property_wise() {
        let mut base = parse_table(r#"{"metre": {"entity": "length", "symbols": ["m"]}}"#, "unit").unwrap();
        let lang = parse_table(r#"{"metre": {"surfaces": ["metre"]}, "foot": {"surfaces": ["feet"]}}"#, "unit").unwrap();
        merge_into(&mut base, &lang);

        let metre: UnitDef = decode("metre", &base["metre"], "unit").unwrap();
        assert_eq!(metre.entity.as_deref(), Some("length"));
        assert_eq!(metre.symbols, vec!["m"]);
        assert_eq!(metre.surfaces, vec!["metre"]);
        assert!(base.contains_key("foot"));
    }

    #[test]
    fn test_parse_table_rejects_non_objects() {
        assert!(parse_table("[]", "unit").is_err());
        assert!(parse_table(r#"{"metre": 3}"#, "unit").is_err());
        assert!(parse_table("{", "unit").is_err());
    }

    #[test]
    fn test_decode_conversion_label() {
        let table = parse_table(
            r#"{"foot": {"entity": "length", "conversion": {"silabel": "metre", "factor": 0.3048}, "URI": "Foot"}}"#,
            "unit",
        )
        .unwrap();
        let foot: UnitDef = decode("foot", &table["foot"], "unit").unwrap();
        assert_eq!(foot.conversion.map(|c| c.si_label), Some("metre".to_string()));
        assert_eq!(foot.uri.as_deref(), Some("Foot"));
    }
}
