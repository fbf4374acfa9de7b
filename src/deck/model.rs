//! The deck model shared by the builder and the inspector.
//!
//! Geometry is in inches, font sizes in points and colours are upper-case
//! `RRGGBB`. The model only holds resolved values: variables, defaults and
//! layout aliases are applied while validating.

use crate::common::unit::GEOMETRY_EPSILON_IN;
use serde::Serialize;

pub const DEFAULT_SLIDE_WIDTH_IN: f64 = 10.0;
pub const DEFAULT_SLIDE_HEIGHT_IN: f64 = 7.5;
pub const DEFAULT_PRESET: &str = "rect";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deck {
    pub meta: DeckMeta,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub slide_width: f64,
    pub slide_height: f64,
}

impl Default for DeckMeta {
    fn default() -> Self {
        Self {
            title: None,
            slide_width: DEFAULT_SLIDE_WIDTH_IN,
            slide_height: DEFAULT_SLIDE_HEIGHT_IN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub layout: String,
    /// Text of the layout's title placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Background {
    pub color: String,
}

/// Position and size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Equal within the unit-conversion tolerance.
    pub fn approx_eq(&self, other: &Geometry) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= GEOMETRY_EPSILON_IN;
        close(self.x, other.x)
            && close(self.y, other.y)
            && close(self.width, other.width)
            && close(self.height, other.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    #[serde(flatten)]
    pub content: ShapeContent,
    #[serde(flatten)]
    pub geometry: Geometry,
}

/// Shape payload, tagged by `kind` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeContent {
    #[serde(rename = "textbox")]
    TextBox {
        runs: Vec<TextRun>,
        #[serde(skip_serializing_if = "Option::is_none")]
        autofit: Option<AutofitMode>,
    },
    Table {
        rows: Vec<Vec<String>>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        header: bool,
    },
    Image {
        src: String,
    },
    #[serde(rename = "shape")]
    Generic {
        preset: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Element the inspector degraded from; informational only.
        #[serde(skip_serializing_if = "Option::is_none")]
        native: Option<String>,
    },
}

impl ShapeContent {
    /// The JSON `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeContent::TextBox { .. } => "textbox",
            ShapeContent::Table { .. } => "table",
            ShapeContent::Image { .. } => "image",
            ShapeContent::Generic { .. } => "shape",
        }
    }

    fn semantic_eq(&self, other: &ShapeContent) -> bool {
        match (self, other) {
            (
                ShapeContent::Generic {
                    preset: p1,
                    fill: f1,
                    text: t1,
                    ..
                },
                ShapeContent::Generic {
                    preset: p2,
                    fill: f2,
                    text: t2,
                    ..
                },
            ) => p1 == p2 && f1 == f2 && t1 == t2,
            (a, b) => a == b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AutofitMode {
    None,
    Shrink,
    Resize,
}

impl AutofitMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(AutofitMode::None),
            "shrink" => Some(AutofitMode::Shrink),
            "resize" => Some(AutofitMode::Resize),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TextRun {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    /// Points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

impl Deck {
    /// Equality up to geometry rounding, ignoring inspector provenance.
    pub fn semantic_eq(&self, other: &Deck) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= GEOMETRY_EPSILON_IN;
        self.meta.title == other.meta.title
            && close(self.meta.slide_width, other.meta.slide_width)
            && close(self.meta.slide_height, other.meta.slide_height)
            && self.slides.len() == other.slides.len()
            && self
                .slides
                .iter()
                .zip(&other.slides)
                .all(|(a, b)| a.semantic_eq(b))
    }

    /// Pretty-printed JSON in the input schema.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Slide {
    pub fn new(layout: impl Into<String>) -> Self {
        Self {
            layout: layout.into(),
            title: None,
            background: None,
            notes: None,
            shapes: Vec::new(),
        }
    }

    pub fn semantic_eq(&self, other: &Slide) -> bool {
        self.layout == other.layout
            && self.title == other.title
            && self.background == other.background
            && self.notes == other.notes
            && self.shapes.len() == other.shapes.len()
            && self.shapes.iter().zip(&other.shapes).all(|(a, b)| {
                a.geometry.approx_eq(&b.geometry) && a.content.semantic_eq(&b.content)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn textbox() -> Shape {
        Shape {
            content: ShapeContent::TextBox {
                runs: vec![TextRun {
                    bold: true,
                    ..TextRun::plain("Hello")
                }],
                autofit: None,
            },
            geometry: Geometry::new(0.0, 0.0, 4.0, 1.0),
        }
    }

    #[test]
    fn test_serialize_shape_flattens_kind_and_geometry() {
        let value = serde_json::to_value(textbox()).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "textbox",
                "runs": [{"text": "Hello", "bold": true}],
                "x": 0.0, "y": 0.0, "width": 4.0, "height": 1.0
            })
        );
    }

    #[test]
    fn test_semantic_eq_tolerates_rounding_and_provenance() {
        let mut a = Slide::new("Blank");
        a.shapes.push(textbox());
        a.shapes.push(Shape {
            content: ShapeContent::Generic {
                preset: "rect".into(),
                fill: None,
                text: None,
                native: None,
            },
            geometry: Geometry::new(1.0, 1.0, 1.0, 1.0),
        });

        let mut b = a.clone();
        b.shapes[0].geometry.x += 4e-7;
        if let ShapeContent::Generic { native, .. } = &mut b.shapes[1].content {
            *native = Some("grpSp".into());
        }
        assert!(a.semantic_eq(&b));
        assert_ne!(a, b);

        b.shapes[0].geometry.x += 1e-3;
        assert!(!a.semantic_eq(&b));

        let mut c = a.clone();
        c.title = Some("Agenda".into());
        assert!(!a.semantic_eq(&c));
    }

    #[test]
    fn test_autofit_parse() {
        assert_eq!(AutofitMode::parse("shrink"), Some(AutofitMode::Shrink));
        assert_eq!(AutofitMode::parse("Shrink"), None);
    }
}
