//! Serialization of an `OpcPackage` into zip bytes.
//!
//! Members are written in a fixed order: `[Content_Types].xml`, the package
//! rels, then every part (sorted by partname) followed by its rels.

use crate::common::xml::escape_attr;
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use std::collections::BTreeMap;
use std::io::{Cursor, Seek, Write};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Extensions whose content type is written once as a `Default`.
static DEFAULT_CONTENT_TYPES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "rels" => ct::OPC_RELATIONSHIPS,
    "xml" => ct::XML,
    "png" => ct::PNG,
    "jpeg" => ct::JPEG,
    "jpg" => ct::JPEG,
    "gif" => ct::GIF,
    "bmp" => ct::BMP,
    "tiff" => ct::TIFF,
};

pub struct PackageWriter;

impl PackageWriter {
    /// Serialize `package` into an in-memory zip.
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        Self::write_to_stream(&mut cursor, package)?;
        Ok(cursor.into_inner())
    }

    /// Serialize `package` into any seekable writer.
    pub fn write_to_stream<W: Write + Seek>(writer: W, package: &OpcPackage) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let cti = ContentTypesItem::from_package(package);
        Self::write_member(&mut zip, options, CONTENT_TYPES_URI, cti.to_xml().as_bytes())?;

        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        let rels_uri = package_uri.rels_uri().map_err(OpcError::InvalidPackUri)?;
        Self::write_member(&mut zip, options, rels_uri.as_str(), package.rels().to_xml().as_bytes())?;

        for part in package.iter_parts() {
            Self::write_member(&mut zip, options, part.partname().as_str(), part.blob())?;

            if !part.rels().is_empty() {
                let rels_uri = part.partname().rels_uri().map_err(OpcError::InvalidPackUri)?;
                Self::write_member(&mut zip, options, rels_uri.as_str(), part.rels().to_xml().as_bytes())?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    fn write_member<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        partname: &str,
        content: &[u8],
    ) -> Result<()> {
        zip.start_file(partname.trim_start_matches('/'), options)?;
        zip.write_all(content)?;
        Ok(())
    }
}

/// Builder for `[Content_Types].xml`.
struct ContentTypesItem {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn from_package(package: &OpcPackage) -> Self {
        let mut cti = Self::new();
        for part in package.iter_parts() {
            cti.add_content_type(part.partname(), part.content_type());
        }
        cti
    }

    /// Use a `Default` when the extension's well-known type matches,
    /// otherwise an `Override` for this partname.
    fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext().to_lowercase();
        match DEFAULT_CONTENT_TYPES.get(ext.as_str()) {
            Some(&known) if known == content_type => {
                self.defaults.insert(ext, content_type.to_string());
            },
            _ => {
                self.overrides
                    .insert(partname.to_string(), content_type.to_string());
            },
        }
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.overrides.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns=""#);
        xml.push_str(namespace::OPC_CONTENT_TYPES);
        xml.push_str(r#"">"#);

        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_attr(ext),
                escape_attr(content_type)
            ));
        }

        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_attr(partname),
                escape_attr(content_type)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;
    use crate::ooxml::opc::part::Part;

    #[test]
    fn test_content_types_xml() {
        let mut cti = ContentTypesItem::new();
        cti.add_content_type(&PackURI::new("/ppt/media/image1.png").unwrap(), ct::PNG);
        cti.add_content_type(
            &PackURI::new("/ppt/presentation.xml").unwrap(),
            ct::PML_PRESENTATION_MAIN,
        );

        let xml = cti.to_xml();

        assert!(xml.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(xml.contains(r#"<Override PartName="/ppt/presentation.xml""#));
    }

    #[test]
    fn test_written_package_reads_back() {
        let mut pkg = OpcPackage::new();
        let main = PackURI::new("/ppt/presentation.xml").unwrap();
        let mut part = Part::new(main.clone(), ct::PML_PRESENTATION_MAIN, b"<p:presentation/>".to_vec());
        let media = PackURI::new("/ppt/media/image1.png").unwrap();
        part.relate_to(&media, rt::IMAGE);
        pkg.add_part(part);
        pkg.add_part(Part::new(media.clone(), ct::PNG, vec![1, 2, 3]));
        pkg.relate_to(&main, rt::OFFICE_DOCUMENT);

        let bytes = PackageWriter::to_bytes(&pkg).unwrap();
        let back = OpcPackage::from_reader(Cursor::new(bytes)).unwrap();

        let main_part = back.main_document_part().unwrap();
        assert_eq!(main_part.content_type(), ct::PML_PRESENTATION_MAIN);
        let image = back.related_part(main_part, "rId1").unwrap();
        assert_eq!(image.blob(), &[1, 2, 3]);
        assert_eq!(image.content_type(), ct::PNG);
    }
}
