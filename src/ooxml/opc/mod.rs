/// Open Packaging Conventions (OPC) implementation.
///
/// The zip-based container underneath every `.pptx`:
///
/// - Package structure (parts, relationships)
/// - Content type management
/// - Reading from and writing to zip archives
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use error::{OpcError, Result};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
