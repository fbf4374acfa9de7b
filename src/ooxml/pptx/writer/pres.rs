/// Presentation writer: assembles slides and template parts into a package.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::metadata::{CoreProperties, app_properties_xml};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, PackURI, PackageWriter, Part};
use crate::ooxml::pptx::template::{self, BuiltinLayout};
use crate::ooxml::pptx::writer::relmap::RelationshipMapper;
use crate::ooxml::pptx::writer::slide::MutableSlide;
use std::fmt::Write as FmtWrite;
use tracing::debug;

/// Default slide size: 10 x 7.5 inches.
pub const DEFAULT_SLIDE_WIDTH: i64 = 9_144_000;
pub const DEFAULT_SLIDE_HEIGHT: i64 = 6_858_000;

const PRESENTATION_URI: &str = "/ppt/presentation.xml";
const SLIDE_MASTER_URI: &str = "/ppt/slideMasters/slideMaster1.xml";
const THEME_URI: &str = "/ppt/theme/theme1.xml";
const NOTES_MASTER_URI: &str = "/ppt/notesMasters/notesMaster1.xml";
const NOTES_THEME_URI: &str = "/ppt/theme/theme2.xml";

/// Ids of `p:sldMasterId` and `p:sldLayoutId` share one range starting here.
const SLIDE_MASTER_ID: u32 = 2_147_483_648;
const FIRST_SLIDE_ID: u32 = 256;

/// A presentation under construction.
#[derive(Debug)]
pub struct MutablePresentation {
    pub(crate) slides: Vec<MutableSlide>,
    /// Slide width in EMU
    slide_width: i64,
    slide_height: i64,
    title: Option<String>,
}

impl MutablePresentation {
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            slide_width: DEFAULT_SLIDE_WIDTH,
            slide_height: DEFAULT_SLIDE_HEIGHT,
            title: None,
        }
    }

    pub fn add_slide(&mut self) -> &mut MutableSlide {
        let slide_id = FIRST_SLIDE_ID + self.slides.len() as u32;
        self.slides.push(MutableSlide::new(slide_id));
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Set the slide size in EMU.
    pub fn set_slide_size(&mut self, width: i64, height: i64) {
        self.slide_width = width;
        self.slide_height = height;
    }

    /// Title recorded in the core properties.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Serialize to `.pptx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let package = self.to_package()?;
        Ok(PackageWriter::to_bytes(&package)?)
    }

    /// Build the complete OPC package.
    pub fn to_package(&self) -> Result<OpcPackage> {
        let mut package = OpcPackage::new();
        let pres_uri = uri(PRESENTATION_URI)?;
        let mut pres_part = Part::new(pres_uri.clone(), ct::PML_PRESENTATION_MAIN, Vec::new());

        // Master, its layouts and theme. Layouts must be related first so
        // they get the rIds the master template refers to.
        let master_uri = uri(SLIDE_MASTER_URI)?;
        let theme_uri = uri(THEME_URI)?;
        let mut master = Part::new(
            master_uri.clone(),
            ct::PML_SLIDE_MASTER,
            template::slide_master_xml().as_bytes().to_vec(),
        );
        for layout in BuiltinLayout::ALL {
            let layout_uri = layout_uri(layout)?;
            let mut layout_part = Part::new(
                layout_uri.clone(),
                ct::PML_SLIDE_LAYOUT,
                layout.xml().as_bytes().to_vec(),
            );
            layout_part.relate_to(&master_uri, rt::SLIDE_MASTER);
            master.relate_to(&layout_uri, rt::SLIDE_LAYOUT);
            package.add_part(layout_part);
        }
        master.relate_to(&theme_uri, rt::THEME);
        package.add_part(master);
        package.add_part(Part::new(
            theme_uri.clone(),
            ct::OFC_THEME,
            template::theme_xml().as_bytes().to_vec(),
        ));
        let master_rid = pres_part.relate_to(&master_uri, rt::SLIDE_MASTER);

        // Slides, with media and notes
        let notes_master_uri = uri(NOTES_MASTER_URI)?;
        let mut rel_mapper = RelationshipMapper::new();
        let mut slide_rids = Vec::with_capacity(self.slides.len());
        let mut image_count = 0usize;
        let mut notes_count = 0usize;

        for (idx, slide) in self.slides.iter().enumerate() {
            let slide_uri = uri(&format!("/ppt/slides/slide{}.xml", idx + 1))?;
            let mut slide_part = Part::new(slide_uri.clone(), ct::PML_SLIDE, Vec::new());
            slide_part.relate_to(&layout_uri(slide.layout())?, rt::SLIDE_LAYOUT);

            for (image_idx, (data, format)) in slide.images().iter().enumerate() {
                image_count += 1;
                let media_uri = uri(&format!(
                    "/ppt/media/image{}.{}",
                    image_count,
                    format.extension()
                ))?;
                let rid = slide_part.relate_to(&media_uri, rt::IMAGE);
                rel_mapper.add_image(idx, image_idx, rid);
                package.add_part(Part::new(media_uri, format.mime_type(), data.clone()));
            }

            if let Some(notes_xml) = slide.generate_notes_xml() {
                notes_count += 1;
                let notes_uri = uri(&format!("/ppt/notesSlides/notesSlide{}.xml", idx + 1))?;
                let mut notes_part =
                    Part::new(notes_uri.clone(), ct::PML_NOTES_SLIDE, notes_xml.into_bytes());
                notes_part.relate_to(&notes_master_uri, rt::NOTES_MASTER);
                notes_part.relate_to(&slide_uri, rt::SLIDE);
                slide_part.relate_to(&notes_uri, rt::NOTES_SLIDE);
                package.add_part(notes_part);
            }

            slide_part.set_blob(slide.to_xml_with_rels(idx, &rel_mapper)?.into_bytes());
            slide_rids.push((slide.slide_id(), pres_part.relate_to(&slide_uri, rt::SLIDE)));
            package.add_part(slide_part);
        }

        // The notes master is only needed when some slide has notes
        let notes_master_rid = if notes_count > 0 {
            let notes_theme_uri = uri(NOTES_THEME_URI)?;
            let mut notes_master = Part::new(
                notes_master_uri.clone(),
                ct::PML_NOTES_MASTER,
                template::notes_master_xml().as_bytes().to_vec(),
            );
            notes_master.relate_to(&notes_theme_uri, rt::THEME);
            package.add_part(notes_master);
            package.add_part(Part::new(
                notes_theme_uri,
                ct::OFC_THEME,
                template::theme_xml().as_bytes().to_vec(),
            ));
            Some(pres_part.relate_to(&notes_master_uri, rt::NOTES_MASTER))
        } else {
            None
        };

        for (partname, content_type, reltype, xml) in [
            ("/ppt/presProps.xml", ct::PML_PRES_PROPS, rt::PRES_PROPS, template::pres_props_xml()),
            ("/ppt/viewProps.xml", ct::PML_VIEW_PROPS, rt::VIEW_PROPS, template::view_props_xml()),
            ("/ppt/tableStyles.xml", ct::PML_TABLE_STYLES, rt::TABLE_STYLES, template::table_styles_xml()),
        ] {
            let part_uri = uri(partname)?;
            pres_part.relate_to(&part_uri, reltype);
            package.add_part(Part::new(part_uri, content_type, xml.as_bytes().to_vec()));
        }
        pres_part.relate_to(&theme_uri, rt::THEME);

        pres_part.set_blob(
            self.generate_presentation_xml(&master_rid, notes_master_rid.as_deref(), &slide_rids)?
                .into_bytes(),
        );
        package.add_part(pres_part);

        // Document properties
        let core_uri = uri("/docProps/core.xml")?;
        let app_uri = uri("/docProps/app.xml")?;
        package.add_part(Part::new(
            core_uri.clone(),
            ct::OPC_CORE_PROPERTIES,
            CoreProperties::new(self.title.clone()).to_xml().into_bytes(),
        ));
        package.add_part(Part::new(
            app_uri.clone(),
            ct::OFC_EXTENDED_PROPERTIES,
            app_properties_xml(self.slides.len(), notes_count).into_bytes(),
        ));

        package.relate_to(&pres_uri, rt::OFFICE_DOCUMENT);
        package.relate_to(&core_uri, rt::CORE_PROPERTIES);
        package.relate_to(&app_uri, rt::EXTENDED_PROPERTIES);

        debug!(
            slides = self.slides.len(),
            images = image_count,
            notes = notes_count,
            parts = package.part_count(),
            "assembled presentation package"
        );
        Ok(package)
    }

    /// `presentation.xml` with the relationship ids assigned during assembly.
    fn generate_presentation_xml(
        &self,
        master_rid: &str,
        notes_master_rid: Option<&str>,
        slide_rids: &[(u32, String)],
    ) -> Result<String> {
        let mut xml = String::with_capacity(1024 + slide_rids.len() * 48);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(concat!(
            r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#,
            r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#,
            r#" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">"#
        ));

        write!(
            xml,
            r#"<p:sldMasterIdLst><p:sldMasterId id="{}" r:id="{}"/></p:sldMasterIdLst>"#,
            SLIDE_MASTER_ID, master_rid
        )?;

        if let Some(rid) = notes_master_rid {
            write!(
                xml,
                r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
                rid
            )?;
        }

        if !slide_rids.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide_id, rid) in slide_rids {
                write!(xml, r#"<p:sldId id="{}" r:id="{}"/>"#, slide_id, rid)?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )?;
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }
}

impl Default for MutablePresentation {
    fn default() -> Self {
        Self::new()
    }
}

fn uri(partname: &str) -> Result<PackURI> {
    PackURI::new(partname).map_err(OoxmlError::InvalidFormat)
}

fn layout_uri(layout: BuiltinLayout) -> Result<PackURI> {
    uri(&format!("/ppt/slideLayouts/slideLayout{}.xml", layout.index()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::Package;
    use crate::ooxml::pptx::format::ImageFormat;
    use crate::ooxml::pptx::shapes::{ShapeGeometry, TextRun};
    use std::io::Cursor;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn geometry() -> ShapeGeometry {
        ShapeGeometry {
            x: 914400,
            y: 914400,
            cx: 1828800,
            cy: 914400,
        }
    }

    #[test]
    fn test_create_presentation() {
        let pres = MutablePresentation::new();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), 9144000);
        assert_eq!(pres.slide_height(), 6858000);
    }

    #[test]
    fn test_package_reads_back() {
        let mut pres = MutablePresentation::new();
        pres.set_title("Quarterly");
        pres.set_slide_size(12192000, 6858000);
        {
            let slide = pres.add_slide();
            slide.set_layout(BuiltinLayout::TitleOnly);
            slide.add_text_box(
                vec![TextRun {
                    text: "Hello".to_string(),
                    ..Default::default()
                }],
                None,
                geometry(),
            );
            slide.set_notes("remember");
        }
        {
            let slide = pres.add_slide();
            slide.add_picture(PNG.to_vec(), ImageFormat::Png, "logo.png", geometry());
        }

        let bytes = pres.to_bytes().unwrap();
        let pkg = Package::from_reader(Cursor::new(bytes)).unwrap();
        let presentation = pkg.presentation().unwrap();
        assert_eq!(presentation.slide_count().unwrap(), 2);
        assert_eq!(presentation.slide_size().unwrap(), Some((12192000, 6858000)));

        let slides = presentation.slides().unwrap();
        assert_eq!(slides[0].layout_name().unwrap().as_deref(), Some("Title Only"));
        assert_eq!(slides[0].notes().unwrap().as_deref(), Some("remember"));
        assert_eq!(slides[1].layout_name().unwrap().as_deref(), Some("Blank"));
        assert_eq!(slides[1].notes().unwrap(), None);

        let opc = pkg.opc_package();
        let media = opc.get_part(&PackURI::new("/ppt/media/image1.png").unwrap()).unwrap();
        assert_eq!(media.blob(), PNG);
        assert!(opc.contains_part(&PackURI::new(NOTES_MASTER_URI).unwrap()));

        let core = pkg.core_properties().unwrap().unwrap();
        assert_eq!(core.title.as_deref(), Some("Quarterly"));
    }

    #[test]
    fn test_no_notes_master_without_notes() {
        let mut pres = MutablePresentation::new();
        pres.add_slide();
        let package = pres.to_package().unwrap();
        assert!(!package.contains_part(&PackURI::new(NOTES_MASTER_URI).unwrap()));
        let xml = String::from_utf8(
            package
                .get_part(&PackURI::new(PRESENTATION_URI).unwrap())
                .unwrap()
                .blob()
                .to_vec(),
        )
        .unwrap();
        assert!(!xml.contains("notesMasterIdLst"));
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
    }
}
