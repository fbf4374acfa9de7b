//! Common types and utilities shared by the deck model and the OOXML layer.

pub mod style;
pub mod unit;
pub mod xml;

pub use style::RGBColor;
