//! Style types shared by the deck model and DrawingML.

pub mod color;

pub use color::RGBColor;
