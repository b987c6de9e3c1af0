//! Metric and binary prefixes

use quantex_core::{Conversion, QuantError};
use crate::defs::UnitDef;

/// A unit prefix: symbol, spellings (first is canonical) and factor
#[derive(Debug, Clone, Copy)]
pub struct Prefix {
    pub symbol: &'static str,
    pub spellings: &'static [&'static str],
    pub factor: f64,
}

const fn decimal(symbol: &'static str, spellings: &'static [&'static str], factor: f64) -> Prefix {
    Prefix { symbol, spellings, factor }
}

pub static METRIC_PREFIXES: [Prefix; 20] = [
    decimal("Y", &["yotta"], 1e24),
    decimal("Z", &["zetta"], 1e21),
    decimal("E", &["exa"], 1e18),
    decimal("P", &["peta"], 1e15),
    decimal("T", &["tera"], 1e12),
    decimal("G", &["giga"], 1e9),
    decimal("M", &["mega"], 1e6),
    decimal("k", &["kilo"], 1e3),
    decimal("h", &["hecto"], 1e2),
    decimal("da", &["deca", "deka"], 1e1),
    decimal("d", &["deci"], 1e-1),
    decimal("c", &["centi"], 1e-2),
    decimal("m", &["milli"], 1e-3),
    decimal("µ", &["micro"], 1e-6),
    decimal("n", &["nano"], 1e-9),
    decimal("p", &["pico"], 1e-12),
    decimal("f", &["femto"], 1e-15),
    decimal("a", &["atto"], 1e-18),
    decimal("z", &["zepto"], 1e-21),
    decimal("y", &["yocto"], 1e-24),
];

/// Binary prefixes, `2^(10n)`
pub static BINARY_PREFIXES: [(&str, &str); 8] = [
    ("Ki", "kibi"),
    ("Mi", "mebi"),
    ("Gi", "gibi"),
    ("Ti", "tebi"),
    ("Pi", "pebi"),
    ("Ei", "exbi"),
    ("Zi", "zebi"),
    ("Yi", "yobi"),
];

/// Find a prefix by symbol
pub fn lookup(symbol: &str) -> Option<Prefix> {
    if let Some(p) = METRIC_PREFIXES.iter().find(|p| p.symbol == symbol) {
        return Some(*p);
    }
    BINARY_PREFIXES
        .iter()
        .position(|(s, _)| *s == symbol)
        .map(|idx| Prefix {
            symbol: BINARY_PREFIXES[idx].0,
            spellings: std::slice::from_ref(&BINARY_PREFIXES[idx].1),
            factor: 2f64.powi(10 * (idx as i32 + 1)),
        })
}

/// Expand a unit definition into the prefixed units it declares.
///
/// The base unit itself is not included.
pub fn expand(name: &str, def: &UnitDef) -> Result<Vec<(String, UnitDef)>, QuantError> {
    let mut out = Vec::with_capacity(def.prefixes.len());
    for symbol in &def.prefixes {
        let prefix = lookup(symbol).ok_or_else(|| {
            QuantError::construction(format!("Given prefix '{}' for unit '{}' not supported", symbol, name))
        })?;
        if def.dimensions.len() > 1 {
            return Err(QuantError::construction(format!(
                "Prefixing not supported for multiple dimensions in '{}'", name
            )));
        }
        let canonical = prefix.spellings.first().copied().unwrap_or(prefix.symbol);

        let surfaces = prefix
            .spellings
            .iter()
            .flat_map(|spelling| def.surfaces.iter().map(move |s| format!("{}{}", spelling, s)))
            .collect();
        let symbols = def.symbols.iter().map(|s| format!("{}{}", prefix.symbol, s)).collect();
        let conversion = def
            .conversion
            .as_ref()
            .map(|c| Conversion::new(c.si_label.clone(), c.factor * prefix.factor));
        let uri = def.uri.as_ref().map(|u| {
            let mut chars = canonical.chars();
            let capital: String = chars.next().map(|c| c.to_uppercase().collect()).unwrap_or_default();
            format!("{}{}{}", capital, chars.as_str(), u.to_lowercase().replace("_(unit)", ""))
        });

        out.push((
            format!("{}{}", canonical, name),
            UnitDef {
                entity: def.entity.clone(),
                dimensions: Default::default(),
                surfaces,
                symbols,
                conversion,
                prefixes: Vec::new(),
                uri,
                currency_code: None,
            },
        ));
    }
    Ok(out)
}
