//! Text report of a single slide for `show`.

use super::InspectWarning;
use crate::common::unit::{emu_to_cm, inches_to_emu};
use crate::deck::{Geometry, ShapeContent, Slide, TextRun};
use std::fmt::Write;

pub(super) fn render(
    number: usize,
    count: usize,
    slide: &Slide,
    names: &[String],
    warnings: &[InspectWarning],
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, number, count, slide, names, warnings);
    out
}

fn write_report(
    out: &mut String,
    number: usize,
    count: usize,
    slide: &Slide,
    names: &[String],
    warnings: &[InspectWarning],
) -> std::fmt::Result {
    writeln!(out, "Slide {number} of {count}")?;
    writeln!(out, "Layout: {}", slide.layout)?;
    if let Some(title) = &slide.title {
        writeln!(out, "Title: {title:?}")?;
    }
    if let Some(background) = &slide.background {
        writeln!(out, "Background: #{}", background.color)?;
    }
    writeln!(out, "Shapes: {}", slide.shapes.len())?;

    for (i, shape) in slide.shapes.iter().enumerate() {
        let name = names.get(i).map(String::as_str).unwrap_or("");
        writeln!(out, "  [{}] {} \"{}\"", i + 1, shape.content.kind(), name)?;
        write_geometry(out, &shape.geometry)?;

        match &shape.content {
            ShapeContent::TextBox { runs, autofit } => {
                if let Some(autofit) = autofit {
                    writeln!(out, "      autofit: {autofit:?}")?;
                }
                for (r, run) in runs.iter().enumerate() {
                    writeln!(out, "      run {}: {:?}{}", r + 1, run.text, run_style(run))?;
                }
            },
            ShapeContent::Table { rows, header } => {
                let cols = rows.first().map_or(0, Vec::len);
                writeln!(
                    out,
                    "      table {}x{}{}",
                    rows.len(),
                    cols,
                    if *header { ", header row" } else { "" }
                )?;
                for row in rows {
                    writeln!(out, "      | {} |", row.join(" | "))?;
                }
            },
            ShapeContent::Image { src } => writeln!(out, "      src: {src}")?,
            ShapeContent::Generic {
                preset,
                fill,
                text,
                native,
            } => {
                write!(out, "      preset: {preset}")?;
                if let Some(fill) = fill {
                    write!(out, ", fill #{fill}")?;
                }
                if let Some(native) = native {
                    write!(out, ", from {native}")?;
                }
                writeln!(out)?;
                if let Some(text) = text {
                    writeln!(out, "      text: {text:?}")?;
                }
            },
        }
    }

    if let Some(notes) = &slide.notes {
        writeln!(out, "Notes:")?;
        for line in notes.lines() {
            writeln!(out, "  {line}")?;
        }
    }

    if !warnings.is_empty() {
        writeln!(out, "Warnings:")?;
        for warning in warnings {
            writeln!(out, "  {warning}")?;
        }
    }
    Ok(())
}

fn write_geometry(out: &mut String, g: &Geometry) -> std::fmt::Result {
    let cm = |inches: f64| emu_to_cm(inches_to_emu(inches));
    writeln!(
        out,
        "      at ({:.2}in, {:.2}in) = ({:.2}cm, {:.2}cm), size {:.2}in x {:.2}in = {:.2}cm x {:.2}cm",
        g.x,
        g.y,
        cm(g.x),
        cm(g.y),
        g.width,
        g.height,
        cm(g.width),
        cm(g.height)
    )
}

fn run_style(run: &TextRun) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (set, label) in [(run.bold, "bold"), (run.italic, "italic"), (run.underline, "underline")] {
        if set {
            parts.push(label.to_string());
        }
    }
    if let Some(size) = run.size {
        parts.push(format!("{size}pt"));
    }
    if let Some(color) = &run.color {
        parts.push(format!("#{color}"));
    }
    if let Some(font) = &run.font {
        parts.push(font.clone());
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}
