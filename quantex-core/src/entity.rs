//! Physical quantity kinds

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::Dimensions;

/// Name of the entity assigned when no known entity matches
pub const UNKNOWN_ENTITY: &str = "unknown";

/// A physical quantity kind (e.g. "length", "volume")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique key
    pub name: String,
    /// Dimensions in terms of other entities; empty for base entities
    pub dimensions: Dimensions,
    /// External identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>, dimensions: Dimensions, uri: Option<String>) -> Self {
        Entity { name: name.into(), dimensions, uri }
    }

    /// The `unknown` entity, carrying whatever dimensions were composed
    pub fn unknown(dimensions: Dimensions) -> Self {
        Entity::new(UNKNOWN_ENTITY, dimensions, None)
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_ENTITY
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.dimensions == other.dimensions
    }
}

impl Eq for Entity {}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dimension;

    #[test]
    fn test_equality_ignores_uri() {
        let a = Entity::new("length", Dimensions::default(), Some("Length".to_string()));
        let b = Entity::new("length", Dimensions::default(), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_includes_dimensions() {
        let a = Entity::unknown(Dimensions::new(vec![Dimension::new("length", -3)]));
        let b = Entity::unknown(Dimensions::default());
        assert!(a.is_unknown());
        assert_ne!(a, b);
    }
}
