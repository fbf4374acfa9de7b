/// Picture shape (`p:pic`).
use crate::common::xml::find_attr;
use crate::ooxml::pptx::shapes::base::{BaseShape, ShapeType};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A picture whose image lives in a related media part.
#[derive(Debug, Clone)]
pub struct Picture {
    base: BaseShape,
}

impl Picture {
    pub fn new(xml_bytes: Vec<u8>) -> Self {
        Self {
            base: BaseShape::new(xml_bytes, ShapeType::Picture),
        }
    }

    /// Wrap an already classified shape; `None` if it is not a picture.
    pub fn from_shape(shape: &BaseShape) -> Option<Self> {
        (*shape.shape_type() == ShapeType::Picture).then(|| Self { base: shape.clone() })
    }

    #[inline]
    pub fn base(&self) -> &BaseShape {
        &self.base
    }

    /// `a:blip/@r:embed`, the relationship to the image part.
    ///
    /// Linked pictures (`r:link`) carry no embedded image and yield `None`.
    pub fn image_r_id(&self) -> Option<String> {
        let mut reader = Reader::from_reader(self.base.xml_bytes());
        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"blip" => {
                    return find_attr(&e, b"embed").filter(|id| !id.is_empty());
                },
                Ok(Event::Eof) | Err(_) => return None,
                _ => {},
            }
        }
    }

    /// Alternative text, where the builder records the image source.
    pub fn description(&self) -> Option<String> {
        self.base.descr().filter(|d| !d.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_r_id() {
        let xml = r#"<p:pic><p:nvPicPr><p:cNvPr id="3" name="Picture 2" descr="img/logo.png"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId7"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr/></p:pic>"#;
        let pic = Picture::new(xml.as_bytes().to_vec());
        assert_eq!(pic.image_r_id().as_deref(), Some("rId7"));
        assert_eq!(pic.description().as_deref(), Some("img/logo.png"));
    }

    #[test]
    fn test_linked_picture() {
        let xml = r#"<p:pic><p:nvPicPr><p:cNvPr id="3" name="P" descr=" "/></p:nvPicPr><p:blipFill><a:blip r:link="rId2"/></p:blipFill></p:pic>"#;
        let pic = Picture::new(xml.as_bytes().to_vec());
        assert_eq!(pic.image_r_id(), None);
        assert_eq!(pic.description(), None);
    }
}
