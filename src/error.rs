//! Error types for building and inspecting decks.
//!
//! Validation problems are [`SchemaError`]s, failures while producing a
//! `.pptx` are [`BuildError`]s and failures while reading one are
//! [`ReadError`]s. [`Error`] unifies the three for callers that do both.
use crate::deck::SchemaError;
use crate::ooxml::OoxmlError;
use crate::ooxml::opc::OpcError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for PowerBB operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Result type for PowerBB operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum BuildError {
    /// A presentation needs at least one slide
    #[error("the deck has no slides")]
    EmptyDeck,

    /// Reading the input or writing the output failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An image referenced by the deck cannot be read
    #[error("slides[{slide}].shapes[{shape}]: cannot read image {}: {source}", path.display())]
    MissingAsset {
        slide: usize,
        shape: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "slides[{slide}].shapes[{shape}]: {} is not a PNG, JPEG, GIF, BMP or TIFF image",
        path.display()
    )]
    UnsupportedImage {
        slide: usize,
        shape: usize,
        path: PathBuf,
    },

    /// The package could not be assembled or serialized
    #[error("cannot assemble the presentation: {0}")]
    Package(#[from] OoxmlError),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum ReadError {
    /// Not a zip package, or its main part is not a presentation
    #[error("{} is not a presentation: {reason}", path.display())]
    NotAPresentation { path: PathBuf, reason: String },

    /// A required part is missing or unparseable
    #[error("{} is corrupt: part {part}: {message}", path.display())]
    Corrupt {
        path: PathBuf,
        part: String,
        message: String,
    },

    /// A 1-based slide number outside the presentation
    #[error("slide {index} is out of range (the presentation has {count} slides)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Classify an error raised while opening a package.
    pub(crate) fn opening(path: impl Into<PathBuf>, err: OoxmlError) -> Self {
        let path = path.into();
        match err {
            OoxmlError::Opc(OpcError::NotAPackage(reason)) | OoxmlError::PartNotFound(reason) => {
                ReadError::NotAPresentation { path, reason }
            },
            OoxmlError::InvalidContentType { got, .. } => ReadError::NotAPresentation {
                path,
                reason: format!("main part has content type {got}"),
            },
            OoxmlError::Opc(OpcError::RelationshipNotFound(reltype)) => {
                ReadError::NotAPresentation {
                    path,
                    reason: format!("no {reltype} relationship"),
                }
            },
            other => ReadError::reading(path, other),
        }
    }

    /// Classify an error raised while walking an opened package.
    pub(crate) fn reading(path: impl Into<PathBuf>, err: OoxmlError) -> Self {
        let path = path.into();
        match err {
            OoxmlError::Io(source) | OoxmlError::Opc(OpcError::IoError(source)) => {
                ReadError::Io { path, source }
            },
            OoxmlError::Xml { part, message } => ReadError::Corrupt {
                path,
                part,
                message,
            },
            OoxmlError::PartNotFound(part) => ReadError::Corrupt {
                path,
                part,
                message: "missing".to_string(),
            },
            other => ReadError::Corrupt {
                path,
                part: "package".to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_classification() {
        let err = ReadError::opening(
            "a.pptx",
            OoxmlError::Opc(OpcError::NotAPackage("bad magic".into())),
        );
        assert!(matches!(err, ReadError::NotAPresentation { .. }));
        assert_eq!(err.to_string(), "a.pptx is not a presentation: bad magic");

        let err = ReadError::opening(
            "a.docx",
            OoxmlError::InvalidContentType {
                expected: "presentation".into(),
                got: "document".into(),
            },
        );
        assert!(matches!(err, ReadError::NotAPresentation { .. }));

        let err = ReadError::opening("a.pptx", OoxmlError::xml("/ppt/presentation.xml", "eof"));
        assert!(
            matches!(err, ReadError::Corrupt { ref part, .. } if part == "/ppt/presentation.xml")
        );
    }

    #[test]
    fn test_build_error_messages() {
        let err = BuildError::UnsupportedImage {
            slide: 2,
            shape: 0,
            path: PathBuf::from("img/a.svg"),
        };
        assert_eq!(
            err.to_string(),
            "slides[2].shapes[0]: img/a.svg is not a PNG, JPEG, GIF, BMP or TIFF image"
        );

        assert_eq!(BuildError::EmptyDeck.to_string(), "the deck has no slides");

        let err: Error = ReadError::IndexOutOfRange { index: 99, count: 3 }.into();
        assert_eq!(
            err.to_string(),
            "slide 99 is out of range (the presentation has 3 slides)"
        );
    }
}
