//! PowerBB - build PowerPoint decks from JSON and read them back
//!
//! A deck is a JSON document describing slides and the shapes on them
//! (text boxes, tables, images and generic auto shapes). The builder turns
//! a validated deck into a `.pptx` file; the inspector turns a `.pptx` back
//! into the same model, so building and inspecting round-trip.
//!
//! # Features
//!
//! - **Validation**: every field is checked before anything is written,
//!   with errors that name the offending path (`slides[2].shapes[0].width`)
//! - **Lenient input**: comments, code fences and trailing commas can be
//!   cleaned up before parsing
//! - **Variables**: `{{name}}` placeholders in text runs and notes expand
//!   from `meta.variables`
//! - **Atomic output**: the `.pptx` is written next to its target and
//!   renamed into place, so a failed build never leaves a partial file
//! - **Inspection**: list slides, describe one slide or dump the deck as
//!   JSON, with warnings for content that cannot be represented
//!
//! # Example - Building a deck
//!
//! ```no_run
//! use powerbb::BuildOptions;
//!
//! # fn main() -> powerbb::Result<()> {
//! let json = r#"{
//!     "meta": {"title": "Q3 Review"},
//!     "slides": [{
//!         "layout": "Title Only",
//!         "shapes": [{
//!             "kind": "textbox", "x": 0.5, "y": 0.5, "width": 9, "height": 1,
//!             "runs": [{"text": "Q3 Review", "bold": true, "size": 36}]
//!         }]
//!     }]
//! }"#;
//! powerbb::build_from_json(json, "q3.pptx", &BuildOptions::new())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting a deck
//!
//! ```no_run
//! use powerbb::InspectOptions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! for summary in powerbb::list("q3.pptx")? {
//!     println!("{summary}");
//! }
//!
//! let inspection = powerbb::inspect("q3.pptx", None, &InspectOptions::new())?;
//! for warning in &inspection.warnings {
//!     eprintln!("{warning}");
//! }
//! println!("{}", inspection.deck.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod common;
pub mod config;
pub mod deck;
pub mod error;
pub mod inspector;
pub mod ooxml;

pub use builder::{build, build_from_file, build_from_json};
pub use config::{BuildOptions, InspectOptions};
pub use deck::{Deck, SchemaError, parse_deck, validate};
pub use error::{BuildError, Error, ReadError, Result};
pub use inspector::{InspectWarning, Inspection, SlideSummary, inspect, list, show};
