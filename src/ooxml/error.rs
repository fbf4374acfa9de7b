/// Error types for PresentationML operations.
use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing or generation error in a named part
    #[error("XML error in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OoxmlError {
    /// XML error attributed to `part`.
    pub fn xml(part: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        OoxmlError::Xml {
            part: part.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<std::fmt::Error> for OoxmlError {
    fn from(err: std::fmt::Error) -> Self {
        OoxmlError::xml("<generated>", err)
    }
}
