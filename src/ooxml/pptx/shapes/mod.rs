/// Shapes found in a slide's shape tree.
///
/// Every shape keeps the raw XML of its element and parses properties on
/// demand; the typed wrappers read the text body, table and picture
/// payloads.
pub mod base;
pub mod picture;
pub mod table;
pub mod textframe;

pub use base::{BaseShape, ShapeGeometry, ShapeType};
pub use picture::Picture;
pub use table::{Table, TableCell, TableRow};
pub use textframe::{AutoFit, Paragraph, TextFrame, TextRun};
