//! Deck builder: a validated [`Deck`] to a `.pptx` file.
//!
//! The package is assembled in memory, images included, so a missing asset
//! fails the build before any output exists. The bytes are then written to
//! a temporary file beside the target and renamed into place.

use crate::common::unit::{centipoints_to_pt, inches_to_emu, pt_to_centipoints};
use crate::config::BuildOptions;
use crate::deck::{self, AutofitMode, Deck, Geometry, ShapeContent, TextRun};
use crate::error::{BuildError, Result};
use crate::ooxml::pptx::format::{ImageFormat, TextFormat};
use crate::ooxml::pptx::shapes::{self, AutoFit, ShapeGeometry};
use crate::ooxml::pptx::{BuiltinLayout, MutablePresentation, SlideBackground};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Build `deck` into `output`.
///
/// On error nothing is written and an existing file at `output` is left
/// untouched.
pub fn build(
    deck: &Deck,
    output: impl AsRef<Path>,
    options: &BuildOptions,
) -> std::result::Result<(), BuildError> {
    let output = output.as_ref();
    let bytes = to_bytes(deck, options)?;
    write_atomically(output, &bytes)?;
    info!(
        path = %output.display(),
        slides = deck.slides.len(),
        bytes = bytes.len(),
        "presentation written"
    );
    Ok(())
}

/// Validate deck JSON text and build it.
pub fn build_from_json(text: &str, output: impl AsRef<Path>, options: &BuildOptions) -> Result<()> {
    let deck = deck::parse_deck(text, options.lenient)?;
    build(&deck, output, options)?;
    Ok(())
}

/// Read, validate and build a deck file; image paths default to being
/// relative to the file's directory.
pub fn build_from_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &BuildOptions,
) -> Result<()> {
    let input = input.as_ref();
    let text = std::fs::read_to_string(input).map_err(|e| BuildError::io(input, e))?;
    debug!(path = %input.display(), bytes = text.len(), "deck input loaded");
    build_from_json(&text, output, &options.for_input(input))
}

/// Serialize `deck` to `.pptx` bytes without touching the filesystem
/// beyond reading images.
pub fn to_bytes(deck: &Deck, options: &BuildOptions) -> std::result::Result<Vec<u8>, BuildError> {
    let presentation = to_presentation(deck, options)?;
    Ok(presentation.to_bytes()?)
}

/// Map `deck` onto a presentation writer.
pub fn to_presentation(
    deck: &Deck,
    options: &BuildOptions,
) -> std::result::Result<MutablePresentation, BuildError> {
    if deck.slides.is_empty() {
        return Err(BuildError::EmptyDeck);
    }

    let mut pres = MutablePresentation::new();
    pres.set_slide_size(
        inches_to_emu(deck.meta.slide_width),
        inches_to_emu(deck.meta.slide_height),
    );
    if let Some(title) = &deck.meta.title {
        pres.set_title(title);
    }

    for (slide_idx, slide) in deck.slides.iter().enumerate() {
        let out = pres.add_slide();

        let layout = BuiltinLayout::from_name(&slide.layout).unwrap_or_else(|| {
            warn!(slide = slide_idx + 1, layout = %slide.layout, "unknown layout, using Blank");
            BuiltinLayout::Blank
        });
        out.set_layout(layout);

        if let Some(background) = &slide.background {
            out.set_background(SlideBackground::solid(background.color.clone()));
        }
        if let Some(title) = &slide.title {
            if layout.has_title() {
                out.set_title(title);
            } else {
                warn!(
                    slide = slide_idx + 1,
                    layout = layout.name(),
                    "no title placeholder, title dropped"
                );
            }
        }
        if let Some(notes) = &slide.notes {
            out.set_notes(notes);
        }

        for (shape_idx, shape) in slide.shapes.iter().enumerate() {
            let geometry = to_emu(&shape.geometry);
            match &shape.content {
                ShapeContent::TextBox { runs, autofit } => {
                    out.add_text_box(
                        runs.iter().map(to_writer_run).collect(),
                        autofit.map(to_autofit),
                        geometry,
                    );
                },
                ShapeContent::Table { rows, header } => {
                    out.add_table(rows.clone(), *header, geometry);
                },
                ShapeContent::Image { src } => {
                    let (data, format) = load_image(src, options, slide_idx, shape_idx)?;
                    out.add_picture(data, format, src, geometry);
                },
                ShapeContent::Generic {
                    preset, fill, text, ..
                } => {
                    out.add_auto_shape(preset, fill.clone(), text.clone(), geometry);
                },
            }
        }
        debug!(slide = slide_idx + 1, layout = layout.name(), shapes = out.shape_count(), "slide built");
    }

    Ok(pres)
}

/// Read and sniff the image behind `src`.
fn load_image(
    src: &str,
    options: &BuildOptions,
    slide: usize,
    shape: usize,
) -> std::result::Result<(Vec<u8>, ImageFormat), BuildError> {
    let path = options.resolve_asset(src);
    let data = std::fs::read(&path).map_err(|source| BuildError::MissingAsset {
        slide,
        shape,
        path: path.clone(),
        source,
    })?;
    let format = ImageFormat::detect_from_bytes(&data)
        .ok_or_else(|| BuildError::UnsupportedImage { slide, shape, path: path.clone() })?;
    debug!(path = %path.display(), bytes = data.len(), ?format, "image loaded");
    Ok((data, format))
}

/// Write `bytes` to a temporary file in the target directory, then rename
/// it over `output`. The temporary file is removed on every error path.
fn write_atomically(output: &Path, bytes: &[u8]) -> std::result::Result<(), BuildError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".powerbb-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| BuildError::io(dir, e))?;
    temp.write_all(bytes).map_err(|e| BuildError::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| BuildError::io(temp.path(), e))?;
    temp.persist(output)
        .map_err(|e| BuildError::io(output, e.error))?;
    Ok(())
}

fn to_emu(geometry: &Geometry) -> ShapeGeometry {
    ShapeGeometry {
        x: inches_to_emu(geometry.x),
        y: inches_to_emu(geometry.y),
        cx: inches_to_emu(geometry.width),
        cy: inches_to_emu(geometry.height),
    }
}

fn to_autofit(mode: AutofitMode) -> AutoFit {
    match mode {
        AutofitMode::None => AutoFit::None,
        AutofitMode::Shrink => AutoFit::Shrink,
        AutofitMode::Resize => AutoFit::Resize,
    }
}

/// Style flags are written only when set; sizes are snapped to the
/// hundredth of a point `a:rPr/@sz` can hold.
fn to_writer_run(run: &TextRun) -> shapes::TextRun {
    shapes::TextRun {
        text: run.text.clone(),
        format: TextFormat {
            font: run.font.clone(),
            size: run.size.map(|pt| centipoints_to_pt(pt_to_centipoints(pt))),
            bold: run.bold.then_some(true),
            italic: run.italic.then_some(true),
            underline: run.underline.then_some(true),
            color: run.color.clone(),
        },
    }
}
