/// Presentation part (`/ppt/presentation.xml`), the main part of a `.pptx`.
use crate::common::xml::{attr_value, find_attr};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::Part;
use crate::ooxml::opc::constants::content_type as ct;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Content types a presentation main part may carry.
const PRESENTATION_CONTENT_TYPES: &[&str] = &[
    ct::PML_PRESENTATION_MAIN,
    ct::PML_PRES_MACRO_MAIN,
    ct::PML_TEMPLATE_MAIN,
    ct::PML_SLIDESHOW_MAIN,
];

/// Read-only view of the presentation part.
pub struct PresentationPart<'a> {
    part: &'a Part,
}

impl<'a> PresentationPart<'a> {
    /// Wrap `part`, checking that it is a presentation.
    pub fn from_part(part: &'a Part) -> Result<Self> {
        if !PRESENTATION_CONTENT_TYPES.contains(&part.content_type()) {
            return Err(OoxmlError::InvalidContentType {
                expected: ct::PML_PRESENTATION_MAIN.to_string(),
                got: part.content_type().to_string(),
            });
        }
        Ok(Self { part })
    }

    #[inline]
    pub fn part(&self) -> &'a Part {
        self.part
    }

    /// `r:id` of every `p:sldId`, in presentation order.
    pub fn slide_rids(&self) -> Result<Vec<String>> {
        let mut reader = Reader::from_reader(self.part.blob());
        let mut buf = Vec::new();
        let mut rids = Vec::new();
        let mut in_list = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"sldIdLst" => in_list = true,
                Ok(Event::End(ref e)) if e.local_name().as_ref() == b"sldIdLst" => break,
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if in_list && e.local_name().as_ref() == b"sldId" =>
                {
                    if let Some(rid) = rel_id(e) {
                        rids.push(rid);
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::xml(self.part.partname(), e)),
                _ => {},
            }
            buf.clear();
        }

        Ok(rids)
    }

    /// `p:sldSz` as (cx, cy) in EMU.
    pub fn slide_size(&self) -> Result<Option<(i64, i64)>> {
        let mut reader = Reader::from_reader(self.part.blob());
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"sldSz" =>
                {
                    let cx = find_attr(e, b"cx").and_then(|v| v.parse().ok());
                    let cy = find_attr(e, b"cy").and_then(|v| v.parse().ok());
                    return Ok(cx.zip(cy));
                },
                Ok(Event::Eof) => return Ok(None),
                Err(e) => return Err(OoxmlError::xml(self.part.partname(), e)),
                _ => {},
            }
            buf.clear();
        }
    }
}

/// `p:sldId` carries both a numeric `id` and an `r:id` sharing the local
/// name; only the prefixed one names the relationship.
pub(crate) fn rel_id(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id")
        .map(|a| attr_value(&a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::PackURI;

    fn part(xml: &str) -> Part {
        Part::new(
            PackURI::new("/ppt/presentation.xml").unwrap(),
            ct::PML_PRESENTATION_MAIN,
            xml.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_slide_rids_in_order() {
        let p = part(concat!(
            r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
            r#"<p:sldIdLst><p:sldId id="257" r:id="rId9"/><p:sldId id="256" r:id="rId2"/></p:sldIdLst>"#,
            r#"<p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#
        ));
        let pres = PresentationPart::from_part(&p).unwrap();
        assert_eq!(pres.slide_rids().unwrap(), vec!["rId9", "rId2"]);
        assert_eq!(pres.slide_size().unwrap(), Some((12192000, 6858000)));
    }

    #[test]
    fn test_rejects_other_content_type() {
        let p = Part::new(
            PackURI::new("/word/document.xml").unwrap(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            Vec::new(),
        );
        assert!(matches!(
            PresentationPart::from_part(&p),
            Err(OoxmlError::InvalidContentType { .. })
        ));
    }
}
