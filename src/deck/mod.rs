//! The deck schema: model, validation and input preprocessing.
//!
//! ```rust
//! use powerbb::deck::{ShapeContent, parse_deck};
//!
//! let deck = parse_deck(
//!     r#"{"slides":[{"shapes":[{"kind":"textbox","x":0,"y":0,"width":4,"height":1,
//!         "runs":[{"text":"Hello","bold":true}]}]}]}"#,
//!     false,
//! )?;
//! assert_eq!(deck.slides.len(), 1);
//! assert!(matches!(deck.slides[0].shapes[0].content, ShapeContent::TextBox { .. }));
//! # Ok::<(), powerbb::deck::SchemaError>(())
//! ```
pub mod error;
pub mod layout;
pub mod lenient;
pub mod model;
pub mod validate;
pub mod vars;

pub use error::SchemaError;
pub use layout::LayoutResolver;
pub use model::{
    AutofitMode, Background, Deck, DeckMeta, Geometry, Shape, ShapeContent, Slide, TextRun,
};
pub use validate::{parse_deck, validate};
