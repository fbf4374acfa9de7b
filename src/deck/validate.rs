//! Deck validation: raw JSON to [`Deck`].
//!
//! Validation walks the `serde_json::Value` tree by hand so every error can
//! name the offending field. Unknown fields are ignored at every level.

use super::error::{Result, SchemaError};
use super::layout::LayoutResolver;
use super::model::{
    AutofitMode, Background, DEFAULT_PRESET, Deck, DeckMeta, Geometry, Shape, ShapeContent,
    Slide, TextRun,
};
use super::vars;
use crate::common::RGBColor;
use crate::common::unit::{centipoints_to_pt, max_inches, pt_to_centipoints};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// `ST_SlideSizeCoordinate` bounds, in inches.
const SLIDE_SIZE_RANGE: (f64, f64) = (1.0, 56.0);
/// `ST_TextFontSize` bounds, in points.
const FONT_SIZE_RANGE: (f64, f64) = (1.0, 4000.0);

/// Validate a parsed JSON document.
pub fn validate(value: &Value) -> Result<Deck> {
    let root = expect_object(value, "")?;
    let validator = Validator::from_meta(root.get("meta"))?;

    let meta = validator.deck_meta(root.get("meta"))?;
    let slides = required(root, "", "slides")?;
    let slides = expect_array(slides, "slides")?;
    if slides.is_empty() {
        return Err(SchemaError::Empty {
            path: "slides".to_string(),
        });
    }

    let slides = slides
        .iter()
        .enumerate()
        .map(|(i, slide)| validator.slide(slide, i))
        .collect::<Result<Vec<_>>>()?;

    debug!(slides = slides.len(), "deck validated");
    Ok(Deck { meta, slides })
}

/// Parse and validate deck JSON text, optionally cleaning it up first.
pub fn parse_deck(text: &str, lenient: bool) -> Result<Deck> {
    let value: Value = if lenient {
        serde_json::from_str(&super::lenient::clean(text))?
    } else {
        serde_json::from_str(text)?
    };
    validate(&value)
}

/// Run defaults from `meta.defaults`.
#[derive(Debug, Default)]
struct RunDefaults {
    font: Option<String>,
    size: Option<f64>,
    color: Option<String>,
}

struct Validator {
    variables: BTreeMap<String, String>,
    defaults: RunDefaults,
    layouts: LayoutResolver,
}

impl Validator {
    fn from_meta(meta: Option<&Value>) -> Result<Self> {
        let Some(meta) = meta.filter(|m| !m.is_null()) else {
            return Ok(Self {
                variables: BTreeMap::new(),
                defaults: RunDefaults::default(),
                layouts: LayoutResolver::default(),
            });
        };
        let meta = expect_object(meta, "meta")?;

        let variables = match meta.get("variables").filter(|v| !v.is_null()) {
            Some(value) => expect_object(value, "meta.variables")?
                .iter()
                .map(|(name, v)| {
                    scalar_to_string(v, &format!("meta.variables.{name}"))
                        .map(|s| (name.clone(), s))
                })
                .collect::<Result<BTreeMap<_, _>>>()?,
            None => BTreeMap::new(),
        };

        let defaults = match meta.get("defaults").filter(|v| !v.is_null()) {
            Some(value) => {
                let obj = expect_object(value, "meta.defaults")?;
                RunDefaults {
                    font: optional_string(obj, "meta.defaults", "font_family")?
                        .filter(|f| !f.is_empty())
                        .map(|f| xml_text(f, "meta.defaults.font_family"))
                        .transpose()?,
                    size: optional_font_size(obj, "meta.defaults")?,
                    color: optional_color(obj, "meta.defaults", "color")?,
                }
            },
            None => RunDefaults::default(),
        };

        let aliases = match meta.get("layout_aliases").filter(|v| !v.is_null()) {
            Some(value) => expect_object(value, "meta.layout_aliases")?
                .iter()
                .map(|(name, v)| {
                    expect_str(v, &format!("meta.layout_aliases.{name}"))
                        .map(|s| (name.clone(), s.to_string()))
                })
                .collect::<Result<BTreeMap<_, _>>>()?,
            None => BTreeMap::new(),
        };
        let default_layout = optional_string(meta, "meta", "default_layout")?;

        Ok(Self {
            variables,
            defaults,
            layouts: LayoutResolver::new(aliases, default_layout),
        })
    }

    fn expand(&self, text: &str) -> String {
        vars::expand(text, &self.variables).into_owned()
    }

    /// An optional text field after expansion. Empty text counts as absent.
    fn optional_text(
        &self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Result<Option<String>> {
        let Some(raw) = optional_string(obj, path, key)? else {
            return Ok(None);
        };
        let text = self.expand(&raw);
        if text.is_empty() {
            return Ok(None);
        }
        xml_text(text, &join(path, key)).map(Some)
    }

    fn deck_meta(&self, meta: Option<&Value>) -> Result<DeckMeta> {
        let mut out = DeckMeta::default();
        let Some(meta) = meta.and_then(Value::as_object) else {
            return Ok(out);
        };

        out.title = self.optional_text(meta, "meta", "title")?;
        for (key, slot) in [
            ("slide_width", &mut out.slide_width),
            ("slide_height", &mut out.slide_height),
        ] {
            if let Some(value) = present(meta, key) {
                let path = format!("meta.{key}");
                *slot = in_range(expect_number(value, &path)?, &path, SLIDE_SIZE_RANGE)?;
            }
        }
        Ok(out)
    }

    fn slide(&self, value: &Value, index: usize) -> Result<Slide> {
        let path = format!("slides[{index}]");
        let obj = expect_object(value, &path)?;

        let layout = optional_string(obj, &path, "layout")?;
        let layout = self.layouts.resolve(layout.as_deref(), index + 1);

        let background = match present(obj, "background") {
            Some(value) => {
                let bg_path = format!("{path}.background");
                let bg = expect_object(value, &bg_path)?;
                optional_color(bg, &bg_path, "color")?.map(|color| Background { color })
            },
            None => None,
        };

        let mut title = self.optional_text(obj, &path, "title")?;
        if title.is_some() && !layout.has_title() {
            warn!(
                slide = index + 1,
                layout = layout.name(),
                "layout has no title placeholder, dropping the slide title"
            );
            title = None;
        }

        let notes = self.optional_text(obj, &path, "notes")?;

        let shapes_path = format!("{path}.shapes");
        let shapes = expect_array(required(obj, &path, "shapes")?, &shapes_path)?
            .iter()
            .enumerate()
            .map(|(i, shape)| self.shape(shape, &format!("{shapes_path}[{i}]")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Slide {
            layout: layout.name().to_string(),
            title,
            background,
            notes,
            shapes,
        })
    }

    fn shape(&self, value: &Value, path: &str) -> Result<Shape> {
        let obj = expect_object(value, path)?;
        let kind_path = format!("{path}.kind");
        let kind = expect_str(required(obj, path, "kind")?, &kind_path)?;

        let content = match kind {
            "textbox" => self.text_box(obj, path)?,
            "table" => self.table(obj, path)?,
            "image" => {
                let src_path = format!("{path}.src");
                let src = expect_str(required(obj, path, "src")?, &src_path)?;
                if src.trim().is_empty() {
                    return Err(SchemaError::Empty { path: src_path });
                }
                ShapeContent::Image {
                    src: xml_text(src.to_string(), &src_path)?,
                }
            },
            "shape" => {
                let preset = optional_string(obj, path, "preset")?
                    .unwrap_or_else(|| DEFAULT_PRESET.to_string());
                if preset.is_empty() || !preset.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(SchemaError::InvalidValue {
                        path: format!("{path}.preset"),
                        reason: format!("'{preset}' is not a preset geometry name"),
                    });
                }
                ShapeContent::Generic {
                    preset,
                    fill: optional_color(obj, path, "fill")?,
                    text: self.optional_text(obj, path, "text")?,
                    native: optional_string(obj, path, "native")?,
                }
            },
            other => {
                return Err(SchemaError::UnknownKind {
                    path: kind_path,
                    kind: other.to_string(),
                });
            },
        };

        Ok(Shape {
            content,
            geometry: geometry(obj, path)?,
        })
    }

    fn text_box(&self, obj: &Map<String, Value>, path: &str) -> Result<ShapeContent> {
        let runs_path = format!("{path}.runs");
        let runs = expect_array(required(obj, path, "runs")?, &runs_path)?;
        if runs.is_empty() {
            return Err(SchemaError::Empty { path: runs_path });
        }
        let runs = runs
            .iter()
            .enumerate()
            .map(|(i, run)| self.run(run, &format!("{runs_path}[{i}]")))
            .collect::<Result<Vec<_>>>()?;
        if runs.iter().all(|run| run.text.is_empty()) {
            return Err(SchemaError::Empty { path: runs_path });
        }

        let autofit = match present(obj, "autofit") {
            Some(value) => {
                let autofit_path = format!("{path}.autofit");
                let mode = expect_str(value, &autofit_path)?;
                Some(
                    AutofitMode::parse(mode).ok_or_else(|| SchemaError::InvalidValue {
                        path: autofit_path,
                        reason: format!(
                            "unknown autofit mode '{mode}' (expected none, shrink or resize)"
                        ),
                    })?,
                )
            },
            None => None,
        };

        Ok(ShapeContent::TextBox { runs, autofit })
    }

    fn run(&self, value: &Value, path: &str) -> Result<TextRun> {
        let obj = expect_object(value, path)?;
        let text_path = format!("{path}.text");
        let text = expect_str(required(obj, path, "text")?, &text_path)?;
        let font = match optional_string(obj, path, "font")?.filter(|f| !f.is_empty()) {
            Some(font) => Some(xml_text(font, &join(path, "font"))?),
            None => self.defaults.font.clone(),
        };

        Ok(TextRun {
            text: xml_text(self.expand(text), &text_path)?,
            bold: optional_bool(obj, path, "bold")?,
            italic: optional_bool(obj, path, "italic")?,
            underline: optional_bool(obj, path, "underline")?,
            size: optional_font_size(obj, path)?.or(self.defaults.size),
            color: optional_color(obj, path, "color")?.or_else(|| self.defaults.color.clone()),
            font,
        })
    }

    fn table(&self, obj: &Map<String, Value>, path: &str) -> Result<ShapeContent> {
        let rows_path = format!("{path}.rows");
        let rows = expect_array(required(obj, path, "rows")?, &rows_path)?;
        if rows.is_empty() {
            return Err(SchemaError::Empty { path: rows_path });
        }

        let declared_cols = match present(obj, "cols") {
            Some(value) => Some(expect_count(value, &format!("{path}.cols"))?),
            None => None,
        };

        let mut grid = Vec::with_capacity(rows.len());
        let mut width: Option<usize> = declared_cols;
        for (r, row) in rows.iter().enumerate() {
            let row_path = format!("{rows_path}[{r}]");
            let cells = expect_array(row, &row_path)?;
            if cells.is_empty() {
                return Err(SchemaError::Empty { path: row_path });
            }
            match width {
                Some(expected) if expected != cells.len() => {
                    return Err(SchemaError::JaggedTable {
                        path: row_path,
                        expected,
                        found: cells.len(),
                    });
                },
                _ => width = Some(cells.len()),
            }

            let cells = cells
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    let cell_path = format!("{row_path}[{c}]");
                    match cell {
                        Value::Null => Ok(String::new()),
                        other => {
                            let text = self.expand(&scalar_to_string(other, &cell_path)?);
                            xml_text(text, &cell_path)
                        },
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            grid.push(cells);
        }

        Ok(ShapeContent::Table {
            rows: grid,
            header: optional_bool(obj, path, "header")?,
        })
    }
}

fn geometry(obj: &Map<String, Value>, path: &str) -> Result<Geometry> {
    let field = |key: &str| -> Result<f64> {
        let field_path = format!("{path}.{key}");
        let value = expect_number(required(obj, path, key)?, &field_path)?;
        in_range(value, &field_path, (0.0, max_inches()))
    };
    Ok(Geometry {
        x: field("x")?,
        y: field("y")?,
        width: field("width")?,
        height: field("height")?,
    })
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(value: &Value, path: &str, expected: &'static str) -> SchemaError {
    SchemaError::TypeMismatch {
        path: if path.is_empty() {
            "(root)".to_string()
        } else {
            path.to_string()
        },
        expected,
        found: type_name(value),
    }
}

/// A field that is present and not `null`.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn required<'a>(obj: &'a Map<String, Value>, path: &str, key: &str) -> Result<&'a Value> {
    present(obj, key).ok_or_else(|| SchemaError::MissingField {
        path: join(path, key),
    })
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| mismatch(value, path, "object"))
}

fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| mismatch(value, path, "array"))
}

fn expect_str<'a>(value: &'a Value, path: &str) -> Result<&'a str> {
    value.as_str().ok_or_else(|| mismatch(value, path, "string"))
}

fn expect_number(value: &Value, path: &str) -> Result<f64> {
    let n = value.as_f64().ok_or_else(|| mismatch(value, path, "number"))?;
    if !n.is_finite() {
        return Err(SchemaError::OutOfRange {
            path: path.to_string(),
            value: n,
            constraint: "must be finite".to_string(),
        });
    }
    Ok(n)
}

fn expect_count(value: &Value, path: &str) -> Result<usize> {
    match value.as_u64() {
        Some(n) if n > 0 => Ok(n as usize),
        _ => match value.as_f64() {
            Some(n) => Err(SchemaError::OutOfRange {
                path: path.to_string(),
                value: n,
                constraint: "must be a positive integer".to_string(),
            }),
            None => Err(mismatch(value, path, "integer")),
        },
    }
}

fn in_range(value: f64, path: &str, (min, max): (f64, f64)) -> Result<f64> {
    if value < min || value > max {
        return Err(SchemaError::OutOfRange {
            path: path.to_string(),
            value,
            constraint: if min == 0.0 {
                format!("must be >= 0 and <= {max:.1}")
            } else {
                format!("must be between {min} and {max}")
            },
        });
    }
    Ok(value)
}

fn scalar_to_string(value: &Value, path: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(mismatch(other, path, "string, number or boolean")),
    }
}

fn optional_string(obj: &Map<String, Value>, path: &str, key: &str) -> Result<Option<String>> {
    present(obj, key)
        .map(|v| expect_str(v, &join(path, key)).map(str::to_string))
        .transpose()
}

fn optional_bool(obj: &Map<String, Value>, path: &str, key: &str) -> Result<bool> {
    match present(obj, key) {
        Some(value) => value
            .as_bool()
            .ok_or_else(|| mismatch(value, &join(path, key), "boolean")),
        None => Ok(false),
    }
}

fn optional_color(obj: &Map<String, Value>, path: &str, key: &str) -> Result<Option<String>> {
    let Some(value) = present(obj, key) else {
        return Ok(None);
    };
    let field_path = join(path, key);
    let raw = expect_str(value, &field_path)?;
    RGBColor::from_hex(raw)
        .map(|c| Some(c.to_hex()))
        .ok_or_else(|| SchemaError::InvalidValue {
            path: field_path,
            reason: format!("'{raw}' is not a RRGGBB hex colour"),
        })
}

/// Font size in points, snapped to the hundredths `a:rPr/@sz` can store.
fn optional_font_size(obj: &Map<String, Value>, path: &str) -> Result<Option<f64>> {
    present(obj, "size")
        .map(|v| {
            let field_path = join(path, "size");
            let size = in_range(expect_number(v, &field_path)?, &field_path, FONT_SIZE_RANGE)?;
            Ok(centipoints_to_pt(pt_to_centipoints(size)))
        })
        .transpose()
}

/// Control characters XML 1.0 cannot carry, even as references.
fn is_xml_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

fn xml_text(text: String, path: &str) -> Result<String> {
    match text.chars().find(|&c| is_xml_forbidden(c)) {
        Some(c) => Err(SchemaError::InvalidValue {
            path: path.to_string(),
            reason: format!("contains U+{:04X}, which XML cannot represent", c as u32),
        }),
        None => Ok(text),
    }
}
