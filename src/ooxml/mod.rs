//! Office Open XML (OOXML) presentation support.
//!
//! The module is organized in two layers:
//!
//! 1. **OPC Layer** (`opc`): package handling (zip, parts, relationships)
//! 2. **PresentationML** (`pptx`): reading slides and shapes out of a
//!    package and generating the parts of a new presentation
//!
//! `metadata` covers the core properties part shared by every OOXML format.
pub mod error;
pub mod metadata;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
