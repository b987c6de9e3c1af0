//! English unit naming and quantity rules

use std::sync::OnceLock;
use regex::Regex;
use tracing::debug;
use quantex_core::{Dimensions, Quantity};
use quantex_plugin::BuildContext;

fn decade_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[1-2]\d\d0s$").unwrap())
}

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[A-Z]+\d+").unwrap())
}

fn ordinal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\d*(1st|2nd|3rd|[04-9]th|1[1-3]th)$").unwrap())
}

/// "metre per second", "square metre", "metre to the 4"
pub fn name_from_dimensions(dimensions: &Dimensions) -> String {
    let mut parts = Vec::with_capacity(dimensions.len());
    for term in dimensions {
        let mut part = String::new();
        if term.power < 0 {
            part.push_str("per ");
        }
        match term.power.abs() {
            1 => part.push_str(&term.base),
            2 => {
                part.push_str("square ");
                part.push_str(&term.base);
            }
            3 => {
                part.push_str("cubic ");
                part.push_str(&term.base);
            }
            n => part.push_str(&format!("{} to the {}", term.base, n)),
        }
        parts.push(part);
    }
    parts.join(" ")
}

/// English business rules for a resolved quantity
pub fn build_quantity(ctx: &BuildContext<'_>, mut quantity: Quantity) -> Option<Vec<Quantity>> {
    let surface = quantity.surface.as_str();

    if ordinal_regex().is_match(surface) || code_regex().is_match(surface) {
        debug!(surface, "ordinal or code, not a quantity");
        return None;
    }

    if quantity.is_dimensionless() && matches!(surface.to_lowercase().as_str(), "a" | "an" | "one") {
        debug!(surface, "lone article, not a quantity");
        return None;
    }

    // "1990s" is a decade, not seconds
    if decade_regex().is_match(surface) {
        quantity.surface.pop();
        quantity.span.1 -= 1;
        quantity.unit = ctx.dimensionless.clone();
    }

    Some(vec![quantity])
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantex_core::Dimension;

    #[test]
    fn test_name_from_dimensions() {
        let dims: Dimensions = vec![
            Dimension::new("metre", 1),
            Dimension::new("second", -2),
        ]
        .into_iter()
        .collect();
        assert_eq!(name_from_dimensions(&dims), "metre per square second");
        let dims: Dimensions = vec![Dimension::new("foot", 3)].into_iter().collect();
        assert_eq!(name_from_dimensions(&dims), "cubic foot");
        let dims: Dimensions = vec![Dimension::new("dollar", 1), Dimension::new("metre", -4)].into_iter().collect();
        assert_eq!(name_from_dimensions(&dims), "dollar per metre to the 4");
    }
}
