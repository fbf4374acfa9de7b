/// Slide background (`p:cSld/p:bg`).
///
/// Decks only describe solid color backgrounds. When reading, other fill
/// kinds are reported so the caller can warn about them.
use crate::common::xml::find_attr;
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideBackground {
    /// `RRGGBB`
    Solid { color: String },
    /// Theme color reference (`bgRef`, `schemeClr`), gradient, picture or pattern
    Other { kind: String },
}

impl SlideBackground {
    pub fn solid(color: impl Into<String>) -> Self {
        SlideBackground::Solid {
            color: color.into(),
        }
    }

    /// Read the background of a slide, if the slide overrides it.
    pub(crate) fn from_xml(xml: &[u8]) -> Result<Option<Self>> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        let mut in_bg = false;
        let mut in_solid = false;
        let mut background: Option<SlideBackground> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let tag_name = e.local_name();
                    match tag_name.as_ref() {
                        b"bg" => in_bg = true,
                        // Shapes follow the background; nothing left to find
                        b"spTree" => break,
                        b"solidFill" if in_bg => in_solid = true,
                        b"srgbClr" if in_solid && background.is_none() => {
                            if let Some(val) = find_attr(e, b"val") {
                                background = Some(Self::solid(val.to_ascii_uppercase()));
                            }
                        },
                        b"schemeClr" | b"sysClr" | b"prstClr" | b"scrgbClr" | b"hslClr"
                            if in_solid && background.is_none() =>
                        {
                            background = Some(SlideBackground::Other {
                                kind: format!("{} color", String::from_utf8_lossy(tag_name.as_ref())),
                            });
                        },
                        b"gradFill" | b"blipFill" | b"pattFill" | b"bgRef"
                            if in_bg && background.is_none() =>
                        {
                            background = Some(SlideBackground::Other {
                                kind: String::from_utf8_lossy(tag_name.as_ref()).into_owned(),
                            });
                        },
                        _ => {},
                    }
                },
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"bg" => in_bg = false,
                    b"solidFill" => in_solid = false,
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::xml("slide background", e)),
                _ => {},
            }
            buf.clear();
        }

        Ok(background)
    }

    /// `p:bg` markup for a solid fill.
    pub(crate) fn to_xml(&self) -> String {
        match self {
            SlideBackground::Solid { color } => format!(
                "<p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>",
                color
            ),
            SlideBackground::Other { .. } => String::new(),
        }
    }
}
