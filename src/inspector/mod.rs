//! Deck inspector: an existing `.pptx` back into the deck model.
//!
//! The inspector is permissive. Shapes it cannot represent become generic
//! shapes with their geometry and a warning; only structural problems
//! (not a presentation, unparseable parts) fail the call.

mod report;

use crate::common::RGBColor;
use crate::common::unit::emu_to_inches;
use crate::config::InspectOptions;
use crate::deck::model::{DEFAULT_PRESET, DEFAULT_SLIDE_HEIGHT_IN, DEFAULT_SLIDE_WIDTH_IN};
use crate::deck::{
    AutofitMode, Background, Deck, DeckMeta, Geometry, Shape, ShapeContent, Slide, TextRun,
};
use crate::error::ReadError;
use crate::ooxml::OoxmlError;
use crate::ooxml::pptx::shapes::{self, AutoFit, BaseShape, Picture, ShapeType, Table};
use crate::ooxml::pptx::{self, BuiltinLayout, Package, SlideBackground};
use serde::Serialize;
use std::fmt;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

type Result<T> = std::result::Result<T, ReadError>;

/// A deck read from a presentation, with what could not be represented.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub deck: Deck,
    pub warnings: Vec<InspectWarning>,
}

/// A non-fatal problem found while inspecting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectWarning {
    /// 1-based slide number
    pub slide: usize,
    /// 0-based index in the slide's shape list
    pub shape: Option<usize>,
    pub message: String,
}

impl fmt::Display for InspectWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Some(shape) => write!(f, "slide {}, shape {}: {}", self.slide, shape, self.message),
            None => write!(f, "slide {}: {}", self.slide, self.message),
        }
    }
}

/// One line of `list` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideSummary {
    /// 1-based
    pub index: usize,
    pub layout: Option<String>,
    pub title: Option<String>,
    pub shape_count: usize,
}

impl fmt::Display for SlideSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | {} | {} shapes",
            self.index,
            self.layout.as_deref().unwrap_or("?"),
            self.title.as_deref().unwrap_or("(untitled)"),
            self.shape_count
        )
    }
}

/// Read the presentation at `path` into a deck.
///
/// `slide` restricts the result to one 1-based slide.
pub fn inspect(
    path: impl AsRef<Path>,
    slide: Option<usize>,
    options: &InspectOptions,
) -> Result<Inspection> {
    let path = path.as_ref();
    let package = open(path)?;
    let reading = |e: OoxmlError| ReadError::reading(path, e);

    let pres = package.presentation().map_err(reading)?;
    let slides = pres.slides().map_err(reading)?;
    let selected = select(&slides, slide)?;

    let (width, height) = match pres.slide_size().map_err(reading)? {
        Some((cx, cy)) => (emu_to_inches(cx), emu_to_inches(cy)),
        None => (DEFAULT_SLIDE_WIDTH_IN, DEFAULT_SLIDE_HEIGHT_IN),
    };
    let title = package
        .core_properties()
        .map_err(reading)?
        .and_then(|props| props.title)
        .filter(|t| !t.is_empty());

    if let Some(dir) = &options.media_dir {
        std::fs::create_dir_all(dir).map_err(|source| ReadError::Io {
            path: dir.clone(),
            source,
        })?;
    }

    let mut reader = SlideReader {
        path,
        media_dir: options.media_dir.as_deref(),
        warnings: Vec::new(),
    };
    let slides = selected
        .iter()
        .map(|slide| reader.slide(slide))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        path = %path.display(),
        slides = slides.len(),
        warnings = reader.warnings.len(),
        "presentation inspected"
    );
    Ok(Inspection {
        deck: Deck {
            meta: DeckMeta {
                title,
                slide_width: width,
                slide_height: height,
            },
            slides,
        },
        warnings: reader.warnings,
    })
}

/// Summaries of every slide, in presentation order.
pub fn list(path: impl AsRef<Path>) -> Result<Vec<SlideSummary>> {
    let path = path.as_ref();
    let package = open(path)?;
    let reading = |e: OoxmlError| ReadError::reading(path, e);

    let pres = package.presentation().map_err(reading)?;
    pres.slides()
        .map_err(reading)?
        .iter()
        .map(|slide| {
            let shapes = slide.shapes().map_err(reading)?;
            let titled = slide_title(&shapes).map_err(reading)?.is_some();
            Ok(SlideSummary {
                index: slide.number(),
                layout: slide.layout_name().map_err(reading)?,
                title: slide.title().map_err(reading)?,
                shape_count: shapes.len() - usize::from(titled),
            })
        })
        .collect()
}

/// Human-readable report of one 1-based slide.
pub fn show(path: impl AsRef<Path>, index: usize) -> Result<String> {
    let path = path.as_ref();
    let package = open(path)?;
    let reading = |e: OoxmlError| ReadError::reading(path, e);

    let pres = package.presentation().map_err(reading)?;
    let slides = pres.slides().map_err(reading)?;
    let slide = select(&slides, Some(index))?[0];

    let shapes = slide.shapes().map_err(reading)?;
    let title_index = slide_title(&shapes).map_err(reading)?.map(|(index, _)| index);
    let names = shapes
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != title_index)
        .map(|(_, shape)| shape.name())
        .collect::<Vec<_>>();

    let mut reader = SlideReader {
        path,
        media_dir: None,
        warnings: Vec::new(),
    };
    let model = reader.slide(slide)?;
    Ok(report::render(
        slide.number(),
        slides.len(),
        &model,
        &names,
        &reader.warnings,
    ))
}

fn open(path: &Path) -> Result<Package> {
    let file = std::fs::File::open(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Package::from_reader(BufReader::new(file)).map_err(|e| ReadError::opening(path, e))
}

/// Position and text of the first title placeholder that carries text.
/// It becomes the slide's `title` rather than a shape.
fn slide_title(shapes: &[BaseShape]) -> crate::ooxml::Result<Option<(usize, String)>> {
    for (index, shape) in shapes.iter().enumerate() {
        if *shape.shape_type() != ShapeType::Shape || !shape.is_title() {
            continue;
        }
        if let Some(text) = shape.text_frame()?.map(|f| f.text()).filter(|t| !t.is_empty()) {
            return Ok(Some((index, text)));
        }
    }
    Ok(None)
}

fn select<'s, 'a>(slides: &'s [pptx::Slide<'a>], filter: Option<usize>) -> Result<Vec<&'s pptx::Slide<'a>>> {
    match filter {
        None => Ok(slides.iter().collect()),
        Some(index) if index == 0 || index > slides.len() => Err(ReadError::IndexOutOfRange {
            index,
            count: slides.len(),
        }),
        Some(index) => Ok(vec![&slides[index - 1]]),
    }
}

/// Per-call state while converting slides.
struct SlideReader<'p> {
    path: &'p Path,
    media_dir: Option<&'p Path>,
    warnings: Vec<InspectWarning>,
}

impl SlideReader<'_> {
    fn ooxml<T>(&self, result: crate::ooxml::Result<T>) -> Result<T> {
        result.map_err(|e| ReadError::reading(self.path, e))
    }

    fn warn(&mut self, slide: usize, shape: Option<usize>, message: String) {
        let warning = InspectWarning {
            slide,
            shape,
            message,
        };
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn slide(&mut self, slide: &pptx::Slide<'_>) -> Result<Slide> {
        let number = slide.number();

        let layout = match self.ooxml(slide.layout_name())? {
            Some(name) => name,
            None => {
                self.warn(number, None, "layout part is missing, reported as Blank".to_string());
                BuiltinLayout::Blank.name().to_string()
            },
        };

        let background = match self.ooxml(slide.background())? {
            Some(SlideBackground::Solid { color }) => match normalize_color(Some(color)) {
                Some(color) => Some(Background { color }),
                None => {
                    self.warn(number, None, "background colour is not RRGGBB, dropped".to_string());
                    None
                },
            },
            Some(SlideBackground::Other { kind }) => {
                self.warn(number, None, format!("{kind} background is not supported, dropped"));
                None
            },
            None => None,
        };

        let notes = self.ooxml(slide.notes())?.filter(|n| !n.is_empty());

        let base_shapes = self.ooxml(slide.shapes())?;
        let title = self.ooxml(slide_title(&base_shapes))?;
        let title_index = title.as_ref().map(|(index, _)| *index);

        let mut shapes = Vec::with_capacity(base_shapes.len());
        for (position, shape) in base_shapes.iter().enumerate() {
            if Some(position) == title_index {
                continue;
            }
            // warnings index the deck's shape list
            let index = shapes.len();
            shapes.push(self.shape(slide, index, shape)?);
        }

        Ok(Slide {
            layout,
            title: title.map(|(_, text)| text),
            background,
            notes,
            shapes,
        })
    }

    fn shape(&mut self, slide: &pptx::Slide<'_>, index: usize, shape: &BaseShape) -> Result<Shape> {
        let number = slide.number();
        let geometry = self.geometry(number, index, shape);
        let content = match shape.shape_type() {
            ShapeType::Shape => self.auto_shape(number, index, shape)?,
            ShapeType::Picture => self.picture(slide, index, shape)?,
            ShapeType::GraphicFrame => self.graphic_frame(number, index, shape)?,
            other => {
                let reason = format!("{} is not supported", other.element_name());
                self.degrade(number, index, shape, reason)
            },
        };
        Ok(Shape { content, geometry })
    }

    /// Offsets and extents in inches. Shapes that inherit their position
    /// from the layout read as zero.
    fn geometry(&mut self, slide: usize, index: usize, shape: &BaseShape) -> Geometry {
        let Some(g) = shape.geometry() else {
            self.warn(
                slide,
                Some(index),
                "no geometry of its own (inherited from the layout), using 0".to_string(),
            );
            return Geometry::default();
        };

        let values = [g.x, g.y, g.cx, g.cy];
        if values.iter().any(|v| *v < 0) {
            self.warn(slide, Some(index), "negative geometry clamped to 0".to_string());
        }
        let inches = |emu: i64| emu_to_inches(emu.max(0));
        Geometry::new(inches(g.x), inches(g.y), inches(g.cx), inches(g.cy))
    }

    fn auto_shape(&mut self, slide: usize, index: usize, shape: &BaseShape) -> Result<ShapeContent> {
        let frame = self.ooxml(shape.text_frame())?;
        let has_text = frame.as_ref().is_some_and(|f| f.has_text());

        if has_text && (shape.is_text_box() || shape.is_placeholder()) {
            if let Some(frame) = frame {
                return Ok(ShapeContent::TextBox {
                    runs: frame.flattened_runs().iter().map(to_deck_run).collect(),
                    autofit: frame.autofit().map(to_autofit_mode),
                });
            }
        }

        if shape.is_text_box() {
            return Ok(self.degrade(slide, index, shape, "empty text box".to_string()));
        }

        Ok(ShapeContent::Generic {
            preset: shape
                .preset_geometry()
                .unwrap_or_else(|| DEFAULT_PRESET.to_string()),
            fill: normalize_color(shape.fill_color()),
            text: frame.map(|f| f.text()).filter(|t| !t.is_empty()),
            native: None,
        })
    }

    fn picture(&mut self, slide: &pptx::Slide<'_>, index: usize, shape: &BaseShape) -> Result<ShapeContent> {
        let number = slide.number();
        let Some(picture) = Picture::from_shape(shape) else {
            return Ok(self.degrade(number, index, shape, "unreadable picture".to_string()));
        };

        let media = picture
            .image_r_id()
            .and_then(|r_id| slide.related_part(&r_id).ok());

        let src = match (media, self.media_dir) {
            (Some(part), Some(dir)) => {
                let file = dir.join(format!("slide{}_{}", number, part.partname().filename()));
                std::fs::write(&file, part.blob()).map_err(|source| ReadError::Io {
                    path: file.clone(),
                    source,
                })?;
                debug!(path = %file.display(), bytes = part.blob().len(), "image extracted");
                Some(path_string(file))
            },
            (media, _) => picture
                .description()
                .or_else(|| media.map(|part| part.partname().filename().to_string())),
        };

        match src {
            Some(src) => Ok(ShapeContent::Image { src }),
            None => Ok(self.degrade(number, index, shape, "picture has no image data".to_string())),
        }
    }

    fn graphic_frame(&mut self, slide: usize, index: usize, shape: &BaseShape) -> Result<ShapeContent> {
        if !shape.has_table() {
            return Ok(self.degrade(
                slide,
                index,
                shape,
                "graphic frame without a table (chart, diagram or object)".to_string(),
            ));
        }

        let Some(table) = self.ooxml(Table::from_graphic_frame_xml(shape.xml_bytes()))? else {
            return Ok(self.degrade(slide, index, shape, "unreadable table".to_string()));
        };
        if table.row_count() == 0 || table.column_count() == 0 {
            return Ok(self.degrade(slide, index, shape, "empty table".to_string()));
        }

        let columns = table.column_count();
        if !table.is_rectangular() {
            self.warn(
                slide,
                Some(index),
                format!("ragged table padded to {columns} columns"),
            );
        }
        let rows = table
            .text_grid()
            .into_iter()
            .map(|mut row| {
                row.resize(columns, String::new());
                row
            })
            .collect();

        Ok(ShapeContent::Table {
            rows,
            header: table.has_header_row(),
        })
    }

    /// Generic shape with best-effort properties, plus a warning.
    fn degrade(&mut self, slide: usize, index: usize, shape: &BaseShape, reason: String) -> ShapeContent {
        let native = shape.shape_type().element_name();
        self.warn(
            slide,
            Some(index),
            format!("{reason}; kept as a generic shape ({native})"),
        );
        ShapeContent::Generic {
            preset: shape
                .preset_geometry()
                .unwrap_or_else(|| DEFAULT_PRESET.to_string()),
            fill: normalize_color(shape.fill_color()),
            text: None,
            native: Some(native),
        }
    }
}

fn to_deck_run(run: &shapes::TextRun) -> TextRun {
    let format = &run.format;
    TextRun {
        text: run.text.clone(),
        bold: format.bold.unwrap_or(false),
        italic: format.italic.unwrap_or(false),
        underline: format.underline.unwrap_or(false),
        size: format.size.filter(|s| *s > 0.0),
        color: normalize_color(format.color.clone()),
        font: format.font.clone(),
    }
}

fn to_autofit_mode(fit: AutoFit) -> AutofitMode {
    match fit {
        AutoFit::None => AutofitMode::None,
        AutoFit::Shrink => AutofitMode::Shrink,
        AutoFit::Resize => AutofitMode::Resize,
    }
}

/// Keep only well-formed `RRGGBB` values, upper-cased.
fn normalize_color(color: Option<String>) -> Option<String> {
    color.and_then(|c| RGBColor::from_hex(&c)).map(|c| c.to_hex())
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
