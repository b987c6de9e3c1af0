//! Quantex Core - Fundamental types
//!
//! This crate provides the data model shared by every Quantex crate:
//! - `Entity`: a physical quantity kind ("length", "speed")
//! - `Unit`: a concrete unit with its entity, dimensions and SI conversion
//! - `Quantity`: one value-with-unit mention found in text
//! - `Dimensions`: `{base, power}` vectors and their lookup keys
//! - `QuantError`: construction, value and language errors

mod dimension;
mod entity;
mod unit;
mod quantity;
mod error;

pub use dimension::{Dimension, Dimensions, DimensionKey};
pub use entity::{Entity, UNKNOWN_ENTITY};
pub use unit::{Unit, Conversion, UNKNOWN_UNIT, DIMENSIONLESS};
pub use quantity::Quantity;
pub use error::{QuantError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Dimension, Dimensions, DimensionKey, Entity, Unit, Conversion, Quantity, QuantError};
}
