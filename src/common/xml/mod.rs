//! XML helpers shared by the reader and the writer.

pub mod escape;

pub use escape::{escape_attr, escape_xml, unescape_xml};

use quick_xml::events::Event;
use quick_xml::events::attributes::Attribute;

/// Append the textual content of `event` to `raw`, still in escaped form.
///
/// quick-xml reports entity and character references as separate events,
/// so text such as `a &amp; b` arrives in three pieces. Collecting the
/// pieces and unescaping once at the end keeps the logic in one place.
/// Returns `false` for non-text events.
pub fn append_escaped_text(raw: &mut Vec<u8>, event: &Event<'_>) -> bool {
    match event {
        Event::Text(e) => raw.extend_from_slice(e.as_ref()),
        Event::GeneralRef(e) => {
            raw.push(b'&');
            raw.extend_from_slice(e.as_ref());
            raw.push(b';');
        },
        Event::CData(e) => {
            let literal = String::from_utf8_lossy(e.as_ref());
            raw.extend_from_slice(escape_xml(&literal).as_bytes());
        },
        _ => return false,
    }
    true
}

/// Decode collected escaped text into a `String`.
#[inline]
pub fn decode_text(raw: &[u8]) -> String {
    unescape_xml(&String::from_utf8_lossy(raw))
}

/// Decoded value of an attribute.
#[inline]
pub fn attr_value(attr: &Attribute<'_>) -> String {
    decode_text(&attr.value)
}

/// Find an attribute by local name (namespace prefix ignored).
pub fn find_attr(e: &quick_xml::events::BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| attr_value(&a))
}
