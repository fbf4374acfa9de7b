/// Slide being written.
use crate::ooxml::error::Result;
use crate::ooxml::pptx::backgrounds::SlideBackground;
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::shapes::{AutoFit, ShapeGeometry, TextRun};
use crate::ooxml::pptx::template::BuiltinLayout;
use crate::ooxml::pptx::writer::relmap::RelationshipMapper;
use crate::ooxml::pptx::writer::shape::{MutableShape, ShapeKind, write_plain_paragraphs};
use std::fmt::Write as FmtWrite;

const SLIDE_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

/// Required `nvGrpSpPr`/`grpSpPr` header of every shape tree.
const SHAPE_TREE_HEADER: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// A slide with its shapes, images and notes, ready to be serialized.
#[derive(Debug)]
pub struct MutableSlide {
    slide_id: u32,
    layout: BuiltinLayout,
    background: Option<SlideBackground>,
    title: Option<String>,
    notes: Option<String>,
    shapes: Vec<MutableShape>,
    images: Vec<(Vec<u8>, ImageFormat)>,
}

impl MutableSlide {
    pub(crate) fn new(slide_id: u32) -> Self {
        Self {
            slide_id,
            layout: BuiltinLayout::default(),
            background: None,
            title: None,
            notes: None,
            shapes: Vec::new(),
            images: Vec::new(),
        }
    }

    /// `p:sldId/@id`
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    pub fn layout(&self) -> BuiltinLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: BuiltinLayout) {
        self.layout = layout;
    }

    pub fn set_background(&mut self, background: SlideBackground) {
        self.background = Some(background);
    }

    /// Text for the layout's title placeholder. Ignored when the layout
    /// has none.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = Some(notes.to_string());
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn has_notes(&self) -> bool {
        self.notes.is_some()
    }

    /// Shape ids start at 2; the shape tree itself is 1.
    fn next_shape_id(&self) -> u32 {
        self.shapes.len() as u32 + 2
    }

    fn push(&mut self, geometry: ShapeGeometry, kind: ShapeKind) {
        let id = self.next_shape_id();
        self.shapes.push(MutableShape::new(id, geometry, kind));
    }

    pub fn add_text_box(
        &mut self,
        runs: Vec<TextRun>,
        autofit: Option<AutoFit>,
        geometry: ShapeGeometry,
    ) {
        self.push(geometry, ShapeKind::TextBox { runs, autofit });
    }

    pub fn add_table(&mut self, rows: Vec<Vec<String>>, header: bool, geometry: ShapeGeometry) {
        self.push(geometry, ShapeKind::Table { rows, header });
    }

    /// Add a picture; `description` becomes its alternative text.
    pub fn add_picture(
        &mut self,
        data: Vec<u8>,
        format: ImageFormat,
        description: &str,
        geometry: ShapeGeometry,
    ) {
        let image_index = self.images.len();
        self.images.push((data, format));
        self.push(
            geometry,
            ShapeKind::Picture {
                image_index,
                description: description.to_string(),
            },
        );
    }

    pub fn add_auto_shape(
        &mut self,
        preset: &str,
        fill: Option<String>,
        text: Option<String>,
        geometry: ShapeGeometry,
    ) {
        self.push(
            geometry,
            ShapeKind::AutoShape {
                preset: preset.to_string(),
                fill,
                text,
            },
        );
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Image payloads in picture order.
    pub(crate) fn images(&self) -> &[(Vec<u8>, ImageFormat)] {
        &self.images
    }

    /// Slide XML with image relationships looked up in `rel_mapper`.
    pub(crate) fn to_xml_with_rels(
        &self,
        slide_index: usize,
        rel_mapper: &RelationshipMapper,
    ) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        write!(xml, "<p:sld {}>", SLIDE_NAMESPACES)?;
        xml.push_str("<p:cSld>");

        // p:bg precedes p:spTree
        if let Some(background) = &self.background {
            xml.push_str(&background.to_xml());
        }

        xml.push_str("<p:spTree>");
        xml.push_str(SHAPE_TREE_HEADER);
        if let Some(title) = self.title.as_deref().filter(|_| self.layout.has_title()) {
            self.write_title(&mut xml, title)?;
        }
        for shape in &self.shapes {
            let rel_id = match &shape.kind {
                ShapeKind::Picture { image_index, .. } => {
                    rel_mapper.get_image_id(slide_index, *image_index)
                },
                _ => None,
            };
            shape.to_xml(&mut xml, rel_id)?;
        }
        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");

        Ok(xml)
    }

    /// Title placeholder with no `spPr` geometry, so the layout's applies.
    /// Its id follows the last shape's.
    fn write_title(&self, xml: &mut String, title: &str) -> Result<()> {
        let id = self.next_shape_id();
        write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Title {}"/>"#,
            id - 1
        )?;
        xml.push_str(concat!(
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/>"#,
            r#"<p:txBody><a:bodyPr/><a:lstStyle/>"#
        ));
        write_plain_paragraphs(xml, title);
        xml.push_str("</p:txBody></p:sp>");
        Ok(())
    }

    /// Notes slide XML, one paragraph per line of the notes text.
    pub(crate) fn generate_notes_xml(&self) -> Option<String> {
        let notes = self.notes.as_ref()?;

        let mut xml = String::with_capacity(1024 + notes.len());
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str("<p:notes ");
        xml.push_str(SLIDE_NAMESPACES);
        xml.push_str("><p:cSld><p:spTree>");
        xml.push_str(SHAPE_TREE_HEADER);
        xml.push_str(concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>"#,
            r#"<p:txBody><a:bodyPr/><a:lstStyle/>"#
        ));
        write_plain_paragraphs(&mut xml, notes);
        xml.push_str("</p:txBody></p:sp></p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
        Some(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::parts::slide::shape_tree;

    fn geometry() -> ShapeGeometry {
        ShapeGeometry {
            x: 0,
            y: 0,
            cx: 100,
            cy: 100,
        }
    }

    #[test]
    fn test_shape_ids_and_order() {
        let mut slide = MutableSlide::new(256);
        slide.add_auto_shape("rect", None, None, geometry());
        slide.add_table(vec![vec!["x".into()]], false, geometry());
        assert_eq!(slide.shape_count(), 2);

        let xml = slide.to_xml_with_rels(0, &RelationshipMapper::new()).unwrap();
        assert!(xml.contains(r#"<p:cNvPr id="2" name="Shape 1"/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="3" name="Table 2"/>"#));

        let shapes = shape_tree(xml.as_bytes(), "slide").unwrap();
        assert_eq!(shapes.len(), 2);
        assert!(shapes[1].has_table());
    }

    #[test]
    fn test_picture_uses_mapped_rel_id() {
        let mut slide = MutableSlide::new(256);
        slide.add_picture(vec![0xFF, 0xD8, 0xFF], ImageFormat::Jpeg, "a.jpg", geometry());
        let mut map = RelationshipMapper::new();
        map.add_image(3, 0, "rId5".to_string());

        let xml = slide.to_xml_with_rels(3, &map).unwrap();
        assert!(xml.contains(r#"<a:blip r:embed="rId5"/>"#));
        assert!(xml.contains(r#"descr="a.jpg""#));
        assert_eq!(slide.images().len(), 1);
    }

    #[test]
    fn test_background_before_shape_tree() {
        let mut slide = MutableSlide::new(256);
        slide.set_background(SlideBackground::solid("FFEEDD"));
        let xml = slide.to_xml_with_rels(0, &RelationshipMapper::new()).unwrap();
        let bg = xml.find("<p:bg>").unwrap();
        let tree = xml.find("<p:spTree>").unwrap();
        assert!(bg < tree);
    }

    #[test]
    fn test_title_placeholder() {
        let mut slide = MutableSlide::new(256);
        slide.set_title("Q3 <Review>");
        slide.add_auto_shape("rect", None, None, geometry());

        let blank = slide.to_xml_with_rels(0, &RelationshipMapper::new()).unwrap();
        assert!(!blank.contains("type=\"title\""));

        slide.set_layout(BuiltinLayout::TitleOnly);
        let xml = slide.to_xml_with_rels(0, &RelationshipMapper::new()).unwrap();
        assert!(xml.contains(r#"<p:cNvPr id="3" name="Title 2"/>"#));
        assert!(xml.contains("<a:t>Q3 &lt;Review&gt;</a:t>"));

        let shapes = shape_tree(xml.as_bytes(), "slide").unwrap();
        assert_eq!(shapes.len(), 2);
        assert!(shapes[0].is_title());
        assert!(!shapes[1].is_title());
    }

    #[test]
    fn test_notes_xml() {
        let mut slide = MutableSlide::new(256);
        assert!(slide.generate_notes_xml().is_none());
        slide.set_notes("line one\nline <two>");
        let xml = slide.generate_notes_xml().unwrap();
        assert!(xml.contains("<a:t>line one</a:t>"));
        assert!(xml.contains("<a:t>line &lt;two&gt;</a:t>"));
    }
}
