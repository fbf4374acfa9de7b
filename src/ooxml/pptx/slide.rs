/// A slide together with the parts it relates to.
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{OpcPackage, Part};
use crate::ooxml::pptx::backgrounds::SlideBackground;
use crate::ooxml::pptx::parts::{NotesSlidePart, SlideLayoutPart, SlidePart};
use crate::ooxml::pptx::shapes::BaseShape;

pub struct Slide<'a> {
    part: SlidePart<'a>,
    package: &'a OpcPackage,
    /// 1-based position in the presentation
    number: usize,
}

impl<'a> Slide<'a> {
    pub(crate) fn new(part: SlidePart<'a>, package: &'a OpcPackage, number: usize) -> Self {
        Self {
            part,
            package,
            number,
        }
    }

    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    #[inline]
    pub fn part(&self) -> &SlidePart<'a> {
        &self.part
    }

    pub fn shapes(&self) -> Result<Vec<BaseShape>> {
        self.part.shapes()
    }

    pub fn background(&self) -> Result<Option<SlideBackground>> {
        self.part.background()
    }

    /// Name of the slide's layout; `None` if the layout part is missing.
    pub fn layout_name(&self) -> Result<Option<String>> {
        let Some(partname) = self.part.layout_partname() else {
            return Ok(None);
        };
        match self.package.get_part(&partname) {
            Ok(part) => Ok(Some(SlideLayoutPart::from_part(part).name()?)),
            Err(_) => Ok(None),
        }
    }

    /// Speaker notes, one line per paragraph.
    pub fn notes(&self) -> Result<Option<String>> {
        let Some(partname) = self.part.notes_partname() else {
            return Ok(None);
        };
        match self.package.get_part(&partname) {
            Ok(part) => NotesSlidePart::from_part(part).notes_text(),
            Err(_) => Ok(None),
        }
    }

    /// Media part behind an `r:embed` of this slide.
    pub fn related_part(&self, r_id: &str) -> Result<&'a Part> {
        Ok(self.package.related_part(self.part.part(), r_id)?)
    }

    /// Title placeholder text, else the first non-empty text on the slide.
    pub fn title(&self) -> Result<Option<String>> {
        let mut first_text: Option<String> = None;
        for shape in self.shapes()? {
            let Some(frame) = shape.text_frame()? else {
                continue;
            };
            let text = frame.text();
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            if shape.is_title() {
                return Ok(Some(text.to_string()));
            }
            first_text.get_or_insert_with(|| text.to_string());
        }
        Ok(first_text)
    }

    /// True if the slide has a notes relationship.
    pub fn has_notes(&self) -> bool {
        self.part.part().rels().part_with_reltype(rt::NOTES_SLIDE).is_ok()
    }
}
