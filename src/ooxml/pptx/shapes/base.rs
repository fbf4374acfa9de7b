/// Base shape types for PowerPoint slides.
use crate::common::xml::find_attr;
use crate::ooxml::error::Result;
use crate::ooxml::pptx::shapes::textframe::TextFrame;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Kind of a direct child of `p:spTree`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeType {
    /// `p:sp`: auto shape or text box
    Shape,
    /// `p:pic`
    Picture,
    /// `p:graphicFrame`: table, chart, diagram or OLE object
    GraphicFrame,
    /// `p:grpSp`
    GroupShape,
    /// `p:cxnSp`
    Connector,
    /// `mc:AlternateContent` wrapping one of the above
    AlternateContent,
    /// Anything else, with its local name
    Unknown(String),
}

impl ShapeType {
    pub fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"sp" => ShapeType::Shape,
            b"pic" => ShapeType::Picture,
            b"graphicFrame" => ShapeType::GraphicFrame,
            b"grpSp" => ShapeType::GroupShape,
            b"cxnSp" => ShapeType::Connector,
            b"AlternateContent" => ShapeType::AlternateContent,
            other => ShapeType::Unknown(String::from_utf8_lossy(other).into_owned()),
        }
    }

    /// Element name as it usually appears in slide XML.
    pub fn element_name(&self) -> String {
        match self {
            ShapeType::Shape => "p:sp".to_string(),
            ShapeType::Picture => "p:pic".to_string(),
            ShapeType::GraphicFrame => "p:graphicFrame".to_string(),
            ShapeType::GroupShape => "p:grpSp".to_string(),
            ShapeType::Connector => "p:cxnSp".to_string(),
            ShapeType::AlternateContent => "mc:AlternateContent".to_string(),
            ShapeType::Unknown(name) => name.clone(),
        }
    }
}

/// Position and size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeGeometry {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// One shape of a slide, holding the raw XML of its element.
///
/// Accessors parse the XML on demand; shapes are small, so re-reading
/// is cheaper than caching every property up front.
#[derive(Debug, Clone)]
pub struct BaseShape {
    xml_bytes: Vec<u8>,
    shape_type: ShapeType,
}

impl BaseShape {
    pub fn new(xml_bytes: Vec<u8>, shape_type: ShapeType) -> Self {
        Self {
            xml_bytes,
            shape_type,
        }
    }

    #[inline]
    pub fn shape_type(&self) -> &ShapeType {
        &self.shape_type
    }

    #[inline]
    pub fn xml_bytes(&self) -> &[u8] {
        &self.xml_bytes
    }

    /// First element named `local`, handed to `f`.
    fn with_first<T>(&self, local: &[u8], f: impl FnOnce(&BytesStart<'_>) -> T) -> Option<T> {
        let mut reader = Reader::from_reader(&self.xml_bytes[..]);
        loop {
            match reader.read_event() {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == local => {
                    return Some(f(&e));
                },
                Ok(Event::Eof) | Err(_) => return None,
                _ => {},
            }
        }
    }

    /// `p:cNvPr/@name`
    pub fn name(&self) -> String {
        self.with_first(b"cNvPr", |e| find_attr(e, b"name"))
            .flatten()
            .unwrap_or_default()
    }

    /// `p:cNvPr/@descr` (alternative text)
    pub fn descr(&self) -> Option<String> {
        self.with_first(b"cNvPr", |e| find_attr(e, b"descr")).flatten()
    }

    /// Position and size from the shape's own transform.
    ///
    /// Only the first `xfrm` is read so that child transforms of a group
    /// do not leak into the group's geometry. Returns `None` when the shape
    /// inherits its position from the layout.
    pub fn geometry(&self) -> Option<ShapeGeometry> {
        let mut reader = Reader::from_reader(&self.xml_bytes[..]);
        let mut in_xfrm = false;
        let mut off: Option<(i64, i64)> = None;
        let mut ext: Option<(i64, i64)> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"xfrm" => in_xfrm = true,
                    b"off" if in_xfrm && off.is_none() => {
                        off = Some((int_attr(e, b"x"), int_attr(e, b"y")));
                    },
                    b"ext" if in_xfrm && ext.is_none() => {
                        ext = Some((int_attr(e, b"cx"), int_attr(e, b"cy")));
                    },
                    _ => {},
                },
                Ok(Event::End(ref e)) if in_xfrm && e.local_name().as_ref() == b"xfrm" => break,
                Ok(Event::Eof) | Err(_) => break,
                _ => {},
            }
        }

        if off.is_none() && ext.is_none() {
            return None;
        }
        let (x, y) = off.unwrap_or_default();
        let (cx, cy) = ext.unwrap_or_default();
        Some(ShapeGeometry { x, y, cx, cy })
    }

    pub fn is_placeholder(&self) -> bool {
        self.with_first(b"ph", |_| ()).is_some()
    }

    /// `p:ph/@type`; a placeholder without a type is a body placeholder.
    pub fn placeholder_type(&self) -> Option<String> {
        self.with_first(b"ph", |e| find_attr(e, b"type").unwrap_or_else(|| "body".to_string()))
    }

    /// True for title and centered-title placeholders.
    pub fn is_title(&self) -> bool {
        matches!(self.placeholder_type().as_deref(), Some("title" | "ctrTitle"))
    }

    /// `p:cNvSpPr/@txBox`
    pub fn is_text_box(&self) -> bool {
        self.shape_type == ShapeType::Shape
            && matches!(
                self.with_first(b"cNvSpPr", |e| find_attr(e, b"txBox")).flatten().as_deref(),
                Some("1" | "true")
            )
    }

    /// `a:prstGeom/@prst`
    pub fn preset_geometry(&self) -> Option<String> {
        self.with_first(b"prstGeom", |e| find_attr(e, b"prst")).flatten()
    }

    /// Solid fill of the shape body (`spPr/a:solidFill/a:srgbClr`).
    ///
    /// Outline fills (`a:ln`) and text fills are not the shape's fill.
    pub fn fill_color(&self) -> Option<String> {
        let mut reader = Reader::from_reader(&self.xml_bytes[..]);
        let mut depth = 0usize;
        let mut sppr_depth: Option<usize> = None;
        let mut fill_depth: Option<usize> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    match e.local_name().as_ref() {
                        b"spPr" if sppr_depth.is_none() => sppr_depth = Some(depth),
                        b"solidFill" if sppr_depth == Some(depth - 1) => fill_depth = Some(depth),
                        _ => {},
                    }
                },
                Ok(Event::Empty(ref e)) => {
                    if fill_depth == Some(depth) && e.local_name().as_ref() == b"srgbClr" {
                        return find_attr(e, b"val").map(|v| v.to_ascii_uppercase());
                    }
                },
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"spPr" && sppr_depth == Some(depth) {
                        return None;
                    }
                    if fill_depth == Some(depth) {
                        fill_depth = None;
                    }
                    depth = depth.saturating_sub(1);
                },
                Ok(Event::Eof) | Err(_) => return None,
                _ => {},
            }
        }
    }

    /// True when a graphic frame carries a DrawingML table.
    pub fn has_table(&self) -> bool {
        self.shape_type == ShapeType::GraphicFrame && self.with_first(b"tbl", |_| ()).is_some()
    }

    /// Text body of an auto shape, if it has one.
    pub fn text_frame(&self) -> Result<Option<TextFrame>> {
        if self.shape_type != ShapeType::Shape {
            return Ok(None);
        }
        TextFrame::from_shape_xml(&self.xml_bytes)
    }
}

/// Integer attribute, 0 when absent or malformed.
fn int_attr(e: &BytesStart<'_>, name: &[u8]) -> i64 {
    find_attr(e, name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT_BOX: &str = r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="TextBox 1" descr="intro"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="914400" y="457200"/><a:ext cx="3657600" cy="914400"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/><a:ln><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln></p:spPr><p:txBody><a:bodyPr/><a:p><a:r><a:rPr><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:rPr><a:t>x</a:t></a:r></a:p></p:txBody></p:sp>"#;

    #[test]
    fn test_text_box_properties() {
        let shape = BaseShape::new(TEXT_BOX.as_bytes().to_vec(), ShapeType::Shape);
        assert_eq!(shape.name(), "TextBox 1");
        assert_eq!(shape.descr().as_deref(), Some("intro"));
        assert!(shape.is_text_box());
        assert!(!shape.is_placeholder());
        assert_eq!(shape.preset_geometry().as_deref(), Some("rect"));
        // Line and run colors are not the fill
        assert_eq!(shape.fill_color(), None);
        assert_eq!(
            shape.geometry(),
            Some(ShapeGeometry {
                x: 914400,
                y: 457200,
                cx: 3657600,
                cy: 914400
            })
        );
    }

    #[test]
    fn test_group_geometry_uses_own_transform() {
        let group = r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="5" name="Group"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="10" y="20"/><a:ext cx="30" cy="40"/><a:chOff x="0" y="0"/><a:chExt cx="30" cy="40"/></a:xfrm></p:grpSpPr><p:sp><p:spPr><a:xfrm><a:off x="99" y="99"/><a:ext cx="1" cy="1"/></a:xfrm></p:spPr></p:sp></p:grpSp>"#;
        let shape = BaseShape::new(group.as_bytes().to_vec(), ShapeType::GroupShape);
        assert_eq!(
            shape.geometry(),
            Some(ShapeGeometry {
                x: 10,
                y: 20,
                cx: 30,
                cy: 40
            })
        );
    }

    #[test]
    fn test_placeholder_without_xfrm() {
        let ph = r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#;
        let shape = BaseShape::new(ph.as_bytes().to_vec(), ShapeType::Shape);
        assert!(shape.is_title());
        assert_eq!(shape.geometry(), None);
        assert!(!shape.is_text_box());
    }

    #[test]
    fn test_fill_color() {
        let sp = r#"<p:sp><p:spPr><a:prstGeom prst="ellipse"/><a:solidFill><a:srgbClr val="1f4e79"/></a:solidFill></p:spPr></p:sp>"#;
        let shape = BaseShape::new(sp.as_bytes().to_vec(), ShapeType::Shape);
        assert_eq!(shape.fill_color().as_deref(), Some("1F4E79"));
    }
}
