/// Text frame (`p:txBody`) of a shape, read into paragraphs and runs.
use crate::common::unit::centipoints_to_pt;
use crate::common::xml::{append_escaped_text, attr_value, decode_text, find_attr};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::format::TextFormat;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Autofit behaviour declared in `a:bodyPr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFit {
    /// `a:noAutofit`
    None,
    /// `a:normAutofit`: shrink text on overflow
    Shrink,
    /// `a:spAutoFit`: resize the shape to fit the text
    Resize,
}

impl AutoFit {
    pub fn from_element(local: &[u8]) -> Option<Self> {
        match local {
            b"noAutofit" => Some(AutoFit::None),
            b"normAutofit" => Some(AutoFit::Shrink),
            b"spAutoFit" => Some(AutoFit::Resize),
            _ => None,
        }
    }

    pub fn element(&self) -> &'static str {
        match self {
            AutoFit::None => "a:noAutofit",
            AutoFit::Shrink => "a:normAutofit",
            AutoFit::Resize => "a:spAutoFit",
        }
    }
}

/// A run of text sharing one character format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub format: TextFormat,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Paragraphs of a `p:txBody` plus its autofit setting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    paragraphs: Vec<Paragraph>,
    autofit: Option<AutoFit>,
}

impl TextFrame {
    /// Read the text body of a `p:sp` element.
    ///
    /// Returns `Ok(None)` when the shape has no `p:txBody`.
    pub fn from_shape_xml(xml: &[u8]) -> Result<Option<Self>> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut frame: Option<TextFrame> = None;
        let mut collector = ParagraphCollector::default();
        let mut in_body_pr = false;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| OoxmlError::xml("text body", e))?;
            match &event {
                Event::Start(e) if e.local_name().as_ref() == b"txBody" => {
                    frame = Some(TextFrame::default());
                },
                Event::End(e) if e.local_name().as_ref() == b"txBody" => break,
                Event::Eof => break,
                _ if frame.is_none() => {},
                Event::Start(e) if e.local_name().as_ref() == b"bodyPr" => in_body_pr = true,
                Event::End(e) if e.local_name().as_ref() == b"bodyPr" => in_body_pr = false,
                Event::Start(e) | Event::Empty(e) if in_body_pr => {
                    if let (Some(frame), Some(fit)) =
                        (frame.as_mut(), AutoFit::from_element(e.local_name().as_ref()))
                    {
                        frame.autofit = Some(fit);
                    }
                },
                other => collector.handle(other),
            }
            buf.clear();
        }

        Ok(frame.map(|mut f| {
            f.paragraphs = collector.finish();
            f
        }))
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn autofit(&self) -> Option<AutoFit> {
        self.autofit
    }

    /// All runs in reading order, across paragraphs.
    ///
    /// A paragraph boundary becomes a `\n` at the end of the last run of
    /// the earlier paragraph so that no text is lost when the runs are
    /// flattened into one text box.
    pub fn flattened_runs(&self) -> Vec<TextRun> {
        let mut runs: Vec<TextRun> = Vec::new();
        let mut pending_break = false;
        for para in &self.paragraphs {
            if pending_break {
                match runs.last_mut() {
                    Some(last) => last.text.push('\n'),
                    None => runs.push(TextRun {
                        text: "\n".to_string(),
                        format: TextFormat::default(),
                    }),
                }
            }
            runs.extend(para.runs.iter().cloned());
            pending_break = true;
        }
        runs
    }

    /// Paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_text(&self) -> bool {
        self.paragraphs
            .iter()
            .any(|p| p.runs.iter().any(|r| !r.text.is_empty()))
    }
}

/// Event-driven reader of `a:p` content, shared by text bodies and table cells.
#[derive(Debug, Default)]
pub(crate) struct ParagraphCollector {
    paragraphs: Vec<Paragraph>,
    current: Option<Paragraph>,
    run: Option<TextRun>,
    /// Line breaks seen before the first run of the paragraph
    leading_breaks: String,
    in_rpr: bool,
    in_run_fill: bool,
    /// Nesting inside `a:ln`/`a:highlight` of a run, whose colours are not the text colour
    skip_depth: usize,
    in_text: bool,
    raw: Vec<u8>,
}

impl ParagraphCollector {
    pub(crate) fn handle(&mut self, event: &Event<'_>) {
        match event {
            Event::Start(e) => self.open(e, false),
            Event::Empty(e) => self.open(e, true),
            Event::End(e) => self.close(e.local_name().as_ref()),
            other if self.in_text => {
                append_escaped_text(&mut self.raw, other);
            },
            _ => {},
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) {
        let name = e.local_name();
        match name.as_ref() {
            b"p" => {
                self.current = Some(Paragraph::default());
                self.leading_breaks.clear();
                if empty {
                    self.close(b"p");
                }
            },
            b"r" | b"fld" if self.current.is_some() => {
                self.run = Some(TextRun::default());
                if empty {
                    self.close(name.as_ref());
                }
            },
            b"br" if self.current.is_some() => self.line_break(),
            b"rPr" if self.run.is_some() => {
                if let Some(run) = self.run.as_mut() {
                    read_run_properties(e, &mut run.format);
                }
                self.in_rpr = !empty;
            },
            b"ln" | b"highlight" | b"effectLst" if self.in_rpr && !empty => self.skip_depth += 1,
            b"solidFill" if self.in_rpr && self.skip_depth == 0 && !empty => self.in_run_fill = true,
            b"srgbClr" if self.in_run_fill => {
                if let (Some(run), Some(val)) = (self.run.as_mut(), find_attr(e, b"val")) {
                    run.format.color = Some(val.to_ascii_uppercase());
                }
            },
            b"latin" if self.in_rpr && self.skip_depth == 0 => {
                if let (Some(run), Some(face)) = (self.run.as_mut(), find_attr(e, b"typeface")) {
                    if !face.is_empty() {
                        run.format.font = Some(face);
                    }
                }
            },
            b"t" if self.run.is_some() && !empty => {
                self.in_text = true;
                self.raw.clear();
            },
            _ => {},
        }
    }

    fn close(&mut self, local: &[u8]) {
        match local {
            b"t" if self.in_text => {
                self.in_text = false;
                let text = decode_text(&self.raw);
                if let Some(run) = self.run.as_mut() {
                    run.text.push_str(&text);
                }
            },
            b"solidFill" => self.in_run_fill = false,
            b"ln" | b"highlight" | b"effectLst" if self.in_rpr => {
                self.skip_depth = self.skip_depth.saturating_sub(1)
            },
            b"rPr" => {
                self.in_rpr = false;
                self.skip_depth = 0;
            },
            b"r" | b"fld" => {
                if let (Some(mut run), Some(para)) = (self.run.take(), self.current.as_mut()) {
                    if !self.leading_breaks.is_empty() {
                        run.text.insert_str(0, &self.leading_breaks);
                        self.leading_breaks.clear();
                    }
                    para.runs.push(run);
                }
            },
            b"p" => {
                if let Some(mut para) = self.current.take() {
                    if !self.leading_breaks.is_empty() {
                        para.runs.push(TextRun {
                            text: std::mem::take(&mut self.leading_breaks),
                            format: TextFormat::default(),
                        });
                    }
                    self.paragraphs.push(para);
                }
            },
            _ => {},
        }
    }

    /// `a:br` inside a paragraph: attach the newline to the preceding run.
    fn line_break(&mut self) {
        match self.current.as_mut().and_then(|p| p.runs.last_mut()) {
            Some(run) => run.text.push('\n'),
            None => self.leading_breaks.push('\n'),
        }
    }

    pub(crate) fn finish(mut self) -> Vec<Paragraph> {
        if self.current.is_some() {
            self.close(b"p");
        }
        self.paragraphs
    }
}

/// Attributes of `a:rPr`.
fn read_run_properties(e: &BytesStart<'_>, format: &mut TextFormat) {
    for attr in e.attributes().flatten() {
        let value = attr_value(&attr);
        match attr.key.local_name().as_ref() {
            b"b" => format.bold = parse_bool(&value),
            b"i" => format.italic = parse_bool(&value),
            b"u" => format.underline = Some(value != "none"),
            b"sz" => {
                format.size = value.trim().parse::<i64>().ok().map(centipoints_to_pt);
            },
            _ => {},
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(body: &str) -> TextFrame {
        let xml = format!("<p:sp><p:spPr/><p:txBody>{body}</p:txBody></p:sp>");
        TextFrame::from_shape_xml(xml.as_bytes()).unwrap().unwrap()
    }

    #[test]
    fn test_runs_with_formatting() {
        let tf = frame(concat!(
            r#"<a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
            r#"<a:p><a:r><a:rPr lang="en-US" b="1" sz="2400"><a:ln><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln>"#,
            r#"<a:solidFill><a:srgbClr val="ff0000"/></a:solidFill><a:latin typeface="Arial"/></a:rPr><a:t>Hello</a:t></a:r>"#,
            r#"<a:r><a:rPr i="1" u="sng"/><a:t> world &amp; more</a:t></a:r></a:p>"#
        ));

        assert_eq!(tf.autofit(), Some(AutoFit::Shrink));
        let runs = &tf.paragraphs()[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Hello");
        assert_eq!(runs[0].format.bold, Some(true));
        assert_eq!(runs[0].format.size, Some(24.0));
        assert_eq!(runs[0].format.color.as_deref(), Some("FF0000"));
        assert_eq!(runs[0].format.font.as_deref(), Some("Arial"));
        assert_eq!(runs[1].text, " world & more");
        assert_eq!(runs[1].format.italic, Some(true));
        assert_eq!(runs[1].format.underline, Some(true));
        assert_eq!(runs[1].format.color, None);
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let tf = frame(r#"<a:bodyPr/><a:p><a:r><a:rPr/><a:t>  padded  </a:t></a:r></a:p>"#);
        assert_eq!(tf.text(), "  padded  ");
    }

    #[test]
    fn test_breaks_and_paragraphs() {
        let tf = frame(concat!(
            r#"<a:bodyPr/><a:p><a:r><a:t>one</a:t></a:r><a:br/><a:r><a:t>two</a:t></a:r></a:p>"#,
            r#"<a:p><a:endParaRPr/></a:p><a:p><a:fld id="{1}" type="slidenum"><a:t>3</a:t></a:fld></a:p>"#
        ));
        assert_eq!(tf.paragraphs().len(), 3);
        assert_eq!(tf.text(), "one\ntwo\n\n3");

        let runs = tf.flattened_runs();
        let joined: String = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, "one\ntwo\n\n3");
    }

    #[test]
    fn test_no_text_body() {
        let xml = b"<p:sp><p:spPr/></p:sp>";
        assert!(TextFrame::from_shape_xml(xml).unwrap().is_none());
    }

    #[test]
    fn test_empty_text_box() {
        let tf = frame(r#"<a:bodyPr/><a:p/>"#);
        assert!(!tf.has_text());
    }
}
