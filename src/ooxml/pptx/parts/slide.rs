/// Slide, slide layout and notes slide parts.
use crate::common::xml::find_attr;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::{PackURI, Part};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::pptx::backgrounds::SlideBackground;
use crate::ooxml::pptx::shapes::base::{BaseShape, ShapeType};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Children of `p:spTree` that describe the tree itself rather than a shape.
const TREE_PROPERTIES: &[&[u8]] = &[b"nvGrpSpPr", b"grpSpPr", b"extLst"];

/// Direct children of the first `p:spTree` in `xml`, in document order.
///
/// Each shape keeps the exact bytes of its element, so namespace prefixes
/// and entity references survive for the per-shape readers.
pub(crate) fn shape_tree(xml: &[u8], part: &str) -> Result<Vec<BaseShape>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();
    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut shapes = Vec::new();

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| OoxmlError::xml(part, e))?;
        match event {
            Event::Start(ref e) if tree_depth == Some(depth) => {
                let local = e.local_name();
                reader
                    .read_to_end_into(e.name(), &mut skip_buf)
                    .map_err(|err| OoxmlError::xml(part, err))?;
                skip_buf.clear();
                if !TREE_PROPERTIES.contains(&local.as_ref()) {
                    let end = reader.buffer_position() as usize;
                    shapes.push(BaseShape::new(
                        xml[start..end].to_vec(),
                        ShapeType::from_local_name(local.as_ref()),
                    ));
                }
            },
            Event::Empty(ref e) if tree_depth == Some(depth) => {
                let local = e.local_name();
                if !TREE_PROPERTIES.contains(&local.as_ref()) {
                    let end = reader.buffer_position() as usize;
                    shapes.push(BaseShape::new(
                        xml[start..end].to_vec(),
                        ShapeType::from_local_name(local.as_ref()),
                    ));
                }
            },
            Event::Start(ref e) => {
                depth += 1;
                if tree_depth.is_none() && e.local_name().as_ref() == b"spTree" {
                    tree_depth = Some(depth);
                }
            },
            Event::End(_) => {
                if tree_depth == Some(depth) {
                    break;
                }
                depth = depth.saturating_sub(1);
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    Ok(shapes)
}

/// `p:cSld/@name`, empty when absent.
fn common_slide_name(xml: &[u8], part: &str) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"cSld" => {
                return Ok(find_attr(e, b"name").unwrap_or_default());
            },
            Ok(Event::Eof) => return Ok(String::new()),
            Err(e) => return Err(OoxmlError::xml(part, e)),
            _ => {},
        }
        buf.clear();
    }
}

/// A slide part (`/ppt/slides/slideN.xml`).
pub struct SlidePart<'a> {
    part: &'a Part,
}

impl<'a> SlidePart<'a> {
    pub fn from_part(part: &'a Part) -> Self {
        Self { part }
    }

    #[inline]
    pub fn part(&self) -> &'a Part {
        self.part
    }

    /// Shapes of the slide's shape tree, in z-order.
    pub fn shapes(&self) -> Result<Vec<BaseShape>> {
        shape_tree(self.part.blob(), self.part.partname().as_str())
    }

    /// Background override, if the slide has one.
    pub fn background(&self) -> Result<Option<SlideBackground>> {
        SlideBackground::from_xml(self.part.blob())
    }

    pub fn name(&self) -> Result<String> {
        common_slide_name(self.part.blob(), self.part.partname().as_str())
    }

    /// Partname of the layout this slide follows.
    pub fn layout_partname(&self) -> Option<PackURI> {
        self.part.partname_with_reltype(rt::SLIDE_LAYOUT).ok()
    }

    /// Partname of the slide's notes, if it has any.
    pub fn notes_partname(&self) -> Option<PackURI> {
        self.part.partname_with_reltype(rt::NOTES_SLIDE).ok()
    }
}

/// A slide layout part (`/ppt/slideLayouts/slideLayoutN.xml`).
pub struct SlideLayoutPart<'a> {
    part: &'a Part,
}

impl<'a> SlideLayoutPart<'a> {
    pub fn from_part(part: &'a Part) -> Self {
        Self { part }
    }

    /// Layout name shown in the layout gallery.
    pub fn name(&self) -> Result<String> {
        common_slide_name(self.part.blob(), self.part.partname().as_str())
    }
}

/// A notes slide part (`/ppt/notesSlides/notesSlideN.xml`).
pub struct NotesSlidePart<'a> {
    part: &'a Part,
}

impl<'a> NotesSlidePart<'a> {
    pub fn from_part(part: &'a Part) -> Self {
        Self { part }
    }

    /// Text of the body placeholder, one line per paragraph.
    ///
    /// Returns `None` when the notes slide has no body or its body is empty.
    pub fn notes_text(&self) -> Result<Option<String>> {
        let shapes = shape_tree(self.part.blob(), self.part.partname().as_str())?;
        for shape in shapes {
            if shape.placeholder_type().as_deref() != Some("body") {
                continue;
            }
            if let Some(frame) = shape.text_frame()? {
                let text = frame.text();
                if !text.is_empty() {
                    return Ok(Some(text));
                }
            }
        }
        Ok(None)
    }
}
