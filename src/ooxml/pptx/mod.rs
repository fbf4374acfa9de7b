//! PowerPoint (.pptx) presentations.
//!
//! Reading goes through [`Package`], which validates the main part and hands
//! out a [`Presentation`] whose [`Slide`]s expose their shapes, layout name,
//! background and notes. Writing goes through
//! [`writer::MutablePresentation`], which assembles a complete package from
//! the built-in template.
//!
//! ```rust,no_run
//! use powerbb::ooxml::pptx::Package;
//!
//! let package = Package::open("deck.pptx")?;
//! let pres = package.presentation()?;
//! for slide in pres.slides()? {
//!     println!("{}: {:?}", slide.number(), slide.title()?);
//! }
//! # Ok::<(), powerbb::ooxml::OoxmlError>(())
//! ```
pub mod backgrounds;
pub mod format;
pub mod package;
pub mod parts;
pub mod presentation;
pub mod shapes;
pub mod slide;
pub mod template;
pub mod writer;

pub use backgrounds::SlideBackground;
pub use format::{ImageFormat, TextFormat};
pub use package::Package;
pub use presentation::Presentation;
pub use slide::Slide;
pub use template::BuiltinLayout;
pub use writer::{MutablePresentation, MutableSlide};
