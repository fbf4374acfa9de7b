/// Presentation: slide order and slide size.
use crate::ooxml::error::Result;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::pptx::parts::{PresentationPart, SlidePart};
use crate::ooxml::pptx::slide::Slide;

/// Slides of a package in presentation order.
///
/// Obtained from [`Package::presentation`](crate::ooxml::pptx::Package::presentation).
pub struct Presentation<'a> {
    part: PresentationPart<'a>,
    package: &'a OpcPackage,
}

impl<'a> Presentation<'a> {
    #[inline]
    pub(crate) fn new(part: PresentationPart<'a>, package: &'a OpcPackage) -> Self {
        Self { part, package }
    }

    pub fn slide_count(&self) -> Result<usize> {
        Ok(self.part.slide_rids()?.len())
    }

    /// Slide width and height in EMU, if declared.
    pub fn slide_size(&self) -> Result<Option<(i64, i64)>> {
        self.part.slide_size()
    }

    /// All slides, in the order of `p:sldIdLst`.
    ///
    /// A slide id whose relationship or part is missing is an error: the
    /// package is structurally broken.
    pub fn slides(&self) -> Result<Vec<Slide<'a>>> {
        let pres_part = self.part.part();
        self.part
            .slide_rids()?
            .iter()
            .enumerate()
            .map(|(idx, rid)| -> Result<Slide<'a>> {
                let part = self.package.related_part(pres_part, rid)?;
                Ok(Slide::new(SlidePart::from_part(part), self.package, idx + 1))
            })
            .collect()
    }
}
