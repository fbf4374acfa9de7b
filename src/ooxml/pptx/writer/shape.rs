/// Shape markup for slides being written.
use crate::common::unit::pt_to_centipoints;
use crate::common::xml::{escape_attr, escape_xml};
use crate::ooxml::error::Result;
use crate::ooxml::pptx::format::TextFormat;
use crate::ooxml::pptx::shapes::{AutoFit, ShapeGeometry, TextRun};
use std::fmt::Write as FmtWrite;

/// A shape on a slide being written.
#[derive(Debug, Clone)]
pub struct MutableShape {
    /// `p:cNvPr/@id`, unique within the slide
    pub(crate) shape_id: u32,
    pub(crate) geometry: ShapeGeometry,
    pub(crate) kind: ShapeKind,
}

#[derive(Debug, Clone)]
pub(crate) enum ShapeKind {
    TextBox {
        runs: Vec<TextRun>,
        autofit: Option<AutoFit>,
    },
    Table {
        rows: Vec<Vec<String>>,
        header: bool,
    },
    Picture {
        /// Position among the slide's pictures
        image_index: usize,
        description: String,
    },
    AutoShape {
        preset: String,
        fill: Option<String>,
        text: Option<String>,
    },
}

impl MutableShape {
    pub(crate) fn new(shape_id: u32, geometry: ShapeGeometry, kind: ShapeKind) -> Self {
        Self {
            shape_id,
            geometry,
            kind,
        }
    }

    /// Default shape name, as PowerPoint numbers them.
    fn name(&self) -> String {
        let n = self.shape_id - 1;
        match &self.kind {
            ShapeKind::TextBox { .. } => format!("TextBox {n}"),
            ShapeKind::Table { .. } => format!("Table {n}"),
            ShapeKind::Picture { .. } => format!("Picture {n}"),
            ShapeKind::AutoShape { .. } => format!("Shape {n}"),
        }
    }

    /// Write this shape's element into `xml`.
    ///
    /// `image_rel_id` is the slide relationship of a picture's media part.
    pub(crate) fn to_xml(&self, xml: &mut String, image_rel_id: Option<&str>) -> Result<()> {
        match &self.kind {
            ShapeKind::TextBox { runs, autofit } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}"/>"#,
                    self.shape_id,
                    self.name()
                )?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

                xml.push_str("<p:spPr>");
                self.write_xfrm(xml, "a:xfrm")?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                write_body_pr(xml, *autofit);
                xml.push_str("<a:lstStyle/><a:p>");
                for run in runs {
                    write_run(xml, run)?;
                }
                xml.push_str("</a:p></p:txBody></p:sp>");
            },
            ShapeKind::Table { rows, header } => {
                xml.push_str("<p:graphicFrame><p:nvGraphicFramePr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}"/>"#,
                    self.shape_id,
                    self.name()
                )?;
                xml.push_str(r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr>"#);
                self.write_xfrm(xml, "p:xfrm")?;
                xml.push_str(r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table">"#);
                self.write_table(xml, rows, *header)?;
                xml.push_str("</a:graphicData></a:graphic></p:graphicFrame>");
            },
            ShapeKind::Picture { description, .. } => {
                xml.push_str("<p:pic><p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}" descr="{}"/>"#,
                    self.shape_id,
                    self.name(),
                    escape_attr(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);

                xml.push_str("<p:blipFill>");
                if let Some(rid) = image_rel_id {
                    write!(xml, r#"<a:blip r:embed="{}"/>"#, rid)?;
                }
                xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill>");

                xml.push_str("<p:spPr>");
                self.write_xfrm(xml, "a:xfrm")?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
            },
            ShapeKind::AutoShape { preset, fill, text } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}"/>"#,
                    self.shape_id,
                    self.name()
                )?;
                xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr>");

                xml.push_str("<p:spPr>");
                self.write_xfrm(xml, "a:xfrm")?;
                write!(
                    xml,
                    r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#,
                    escape_attr(preset)
                )?;
                match fill {
                    Some(color) => write!(
                        xml,
                        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
                        color
                    )?,
                    None => xml.push_str("<a:noFill/>"),
                }
                xml.push_str("</p:spPr>");

                if let Some(text) = text {
                    xml.push_str(r#"<p:txBody><a:bodyPr rtlCol="0" anchor="ctr"/><a:lstStyle/>"#);
                    write_plain_paragraphs(xml, text);
                    xml.push_str("</p:txBody>");
                }
                xml.push_str("</p:sp>");
            },
        }

        Ok(())
    }

    fn write_xfrm(&self, xml: &mut String, tag: &str) -> Result<()> {
        let g = &self.geometry;
        write!(
            xml,
            r#"<{tag}><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></{tag}>"#,
            g.x, g.y, g.cx, g.cy
        )?;
        Ok(())
    }

    /// `a:tbl` with the frame width split evenly across columns and the
    /// frame height across rows. The last column and row absorb the
    /// rounding remainder so the grid adds up to the frame exactly.
    fn write_table(&self, xml: &mut String, rows: &[Vec<String>], header: bool) -> Result<()> {
        let row_count = rows.len().max(1) as i64;
        let col_count = rows.first().map_or(1, |r| r.len().max(1)) as i64;
        let col_width = self.geometry.cx / col_count;
        let row_height = self.geometry.cy / row_count;

        xml.push_str("<a:tbl>");
        if header {
            xml.push_str(r#"<a:tblPr firstRow="1" bandRow="1"/>"#);
        } else {
            xml.push_str("<a:tblPr/>");
        }

        xml.push_str("<a:tblGrid>");
        for col in 0..col_count {
            let w = if col == col_count - 1 {
                self.geometry.cx - col_width * (col_count - 1)
            } else {
                col_width
            };
            write!(xml, r#"<a:gridCol w="{}"/>"#, w)?;
        }
        xml.push_str("</a:tblGrid>");

        for (idx, row) in rows.iter().enumerate() {
            let h = if idx as i64 == row_count - 1 {
                self.geometry.cy - row_height * (row_count - 1)
            } else {
                row_height
            };
            write!(xml, r#"<a:tr h="{}">"#, h)?;
            for cell in row {
                xml.push_str("<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>");
                write_plain_paragraphs(xml, cell);
                xml.push_str("</a:txBody><a:tcPr/></a:tc>");
            }
            xml.push_str("</a:tr>");
        }
        xml.push_str("</a:tbl>");
        Ok(())
    }
}

fn write_body_pr(xml: &mut String, autofit: Option<AutoFit>) {
    match autofit {
        Some(fit) => {
            xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"><"#);
            xml.push_str(fit.element());
            xml.push_str("/></a:bodyPr>");
        },
        None => xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"/>"#),
    }
}

/// One `a:r`. Child order in `a:rPr` follows the schema: fill before
/// the latin font.
fn write_run(xml: &mut String, run: &TextRun) -> Result<()> {
    let format: &TextFormat = &run.format;
    xml.push_str(r#"<a:r><a:rPr lang="en-US""#);
    if let Some(size) = format.size {
        write!(xml, r#" sz="{}""#, pt_to_centipoints(size))?;
    }
    if format.bold == Some(true) {
        xml.push_str(r#" b="1""#);
    }
    if format.italic == Some(true) {
        xml.push_str(r#" i="1""#);
    }
    if format.underline == Some(true) {
        xml.push_str(r#" u="sng""#);
    }
    xml.push_str(r#" dirty="0""#);

    if format.color.is_none() && format.font.is_none() {
        xml.push_str("/>");
    } else {
        xml.push('>');
        if let Some(color) = &format.color {
            write!(xml, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color)?;
        }
        if let Some(font) = &format.font {
            write!(xml, r#"<a:latin typeface="{}"/>"#, escape_attr(font))?;
        }
        xml.push_str("</a:rPr>");
    }

    write!(xml, "<a:t>{}</a:t></a:r>", escape_xml(&run.text))?;
    Ok(())
}

/// Unformatted text as one paragraph per line.
pub(crate) fn write_plain_paragraphs(xml: &mut String, text: &str) {
    for line in text.split('\n') {
        if line.is_empty() {
            xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
        } else {
            xml.push_str(r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>"#);
            xml.push_str(&escape_xml(line));
            xml.push_str("</a:t></a:r></a:p>");
        }
    }
}
