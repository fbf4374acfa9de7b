/// Package core properties (`docProps/core.xml`) and the extended
/// properties stub (`docProps/app.xml`).
///
/// Only the fields a deck round-trips are modelled: the title, plus the
/// creator and timestamps written on every build.
use crate::common::xml::{append_escaped_text, decode_text, escape_xml};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Application name recorded in the written properties.
pub const APPLICATION: &str = concat!("powerbb ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl CoreProperties {
    /// Fresh properties stamped with the current time.
    pub fn new(title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            title,
            creator: Some("powerbb".to_string()),
            created: Some(now),
            modified: Some(now),
        }
    }

    /// Read the core properties of `package`, if it has any.
    pub fn from_package(package: &OpcPackage) -> Result<Option<Self>> {
        let part = match package.part_by_reltype(rt::CORE_PROPERTIES) {
            Ok(part) => part,
            Err(_) => match package
                .iter_parts()
                .find(|p| p.content_type() == ct::OPC_CORE_PROPERTIES)
            {
                Some(part) => part,
                None => return Ok(None),
            },
        };
        Self::from_xml(part.blob())
            .map(Some)
            .map_err(|e| OoxmlError::xml(part.partname(), e))
    }

    fn from_xml(xml: &[u8]) -> std::result::Result<Self, quick_xml::Error> {
        let mut reader = Reader::from_reader(xml);
        let mut props = Self::default();
        let mut buf = Vec::new();
        let mut current: Option<Vec<u8>> = None;
        let mut raw = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf)?;
            match &event {
                Event::Start(e) => {
                    current = Some(e.local_name().as_ref().to_vec());
                    raw.clear();
                },
                Event::End(_) => {
                    if let Some(name) = current.take() {
                        let text = decode_text(&raw);
                        let text = text.trim();
                        if !text.is_empty() {
                            match name.as_slice() {
                                b"title" => props.title = Some(text.to_string()),
                                b"creator" => props.creator = Some(text.to_string()),
                                b"created" => props.created = parse_datetime(text),
                                b"modified" => props.modified = parse_datetime(text),
                                _ => {},
                            }
                        }
                    }
                },
                Event::Eof => break,
                other => {
                    if current.is_some() {
                        append_escaped_text(&mut raw, other);
                    }
                },
            }
            buf.clear();
        }

        Ok(props)
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(768);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(concat!(
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
            r#" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/""#,
            r#" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
        ));
        if let Some(title) = &self.title {
            xml.push_str("<dc:title>");
            xml.push_str(&escape_xml(title));
            xml.push_str("</dc:title>");
        }
        if let Some(creator) = &self.creator {
            xml.push_str("<dc:creator>");
            xml.push_str(&escape_xml(creator));
            xml.push_str("</dc:creator>");
        }
        for (tag, value) in [("created", self.created), ("modified", self.modified)] {
            if let Some(dt) = value {
                xml.push_str(&format!(
                    r#"<dcterms:{tag} xsi:type="dcterms:W3CDTF">{}</dcterms:{tag}>"#,
                    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
                ));
            }
        }
        xml.push_str("</cp:coreProperties>");
        xml
    }
}

/// Minimal `docProps/app.xml`.
pub fn app_properties_xml(slide_count: usize, notes_count: usize) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties""#,
            r#" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<Application>{}</Application><PresentationFormat>Custom</PresentationFormat>",
            "<Slides>{}</Slides><Notes>{}</Notes><HiddenSlides>0</HiddenSlides>",
            "<AppVersion>16.0000</AppVersion></Properties>"
        ),
        escape_xml(APPLICATION),
        slide_count,
        notes_count
    )
}

/// Parse the W3CDTF timestamps used in core properties.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}
