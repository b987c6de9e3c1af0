//! Vietnamese unit naming and quantity rules

use tracing::debug;
use quantex_core::{Dimensions, Quantity};
use quantex_plugin::BuildContext;

/// Lone words that double as ordinary words: "không" (not), "một" (a), "năm" (year)
const AMBIGUOUS_WORDS: [&str; 3] = ["không", "một", "năm"];

/// "mét trên giây", "mét vuông", "mét mũ 4"
pub fn name_from_dimensions(dimensions: &Dimensions) -> String {
    let mut parts = Vec::with_capacity(dimensions.len());
    for term in dimensions {
        let mut part = String::new();
        if term.power < 0 {
            part.push_str("trên ");
        }
        part.push_str(&term.base);
        match term.power.abs() {
            1 => {}
            2 => part.push_str(" vuông"),
            3 => part.push_str(" khối"),
            n => part.push_str(&format!(" mũ {}", n)),
        }
        parts.push(part);
    }
    parts.join(" ")
}

/// Vietnamese business rules for a resolved quantity
pub fn build_quantity(ctx: &BuildContext<'_>, quantity: Quantity) -> Option<Vec<Quantity>> {
    let surface = quantity.surface.to_lowercase();

    if quantity.is_dimensionless() && AMBIGUOUS_WORDS.contains(&surface.as_str()) {
        debug!(surface, "lone number word, not a quantity");
        return None;
    }

    // "thứ hai" is Monday, "thứ 3" is third
    let before = ctx.original.get(..quantity.span.0).unwrap_or_default();
    if before.trim_end().to_lowercase().ends_with("thứ") {
        debug!(surface, "ordinal, not a quantity");
        return None;
    }

    Some(vec![quantity])
}
