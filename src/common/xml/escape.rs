use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'", "\r"])
        .expect("Failed to build XML escaper")
});

static ATTR_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'", "\r", "\n", "\t"])
        .expect("Failed to build XML attribute escaper")
});

/// Escape XML special characters for element content.
///
/// Carriage returns become character references so that parsers which
/// normalize line endings still hand back the original text.
///
/// # Examples
///
/// ```
/// use powerbb::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hi\"</tag>"), "&lt;tag&gt;&quot;hi&quot;&lt;/tag&gt;");
/// assert_eq!(escape_xml("a\r\nb"), "a&#13;\nb");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;", "&#13;"])
}

/// Escape a value for use inside a double-quoted attribute.
///
/// Whitespace control characters are written as character references,
/// since attribute-value normalization would otherwise turn them into spaces.
#[inline]
pub fn escape_attr(s: &str) -> String {
    ATTR_ESCAPER.replace_all(
        s,
        &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;", "&#13;", "&#10;", "&#9;"],
    )
}

/// Unescape XML entity and character references.
///
/// Handles the five predefined entities plus decimal (`&#10;`) and
/// hexadecimal (`&#xA;`) character references. Unknown or malformed
/// references are left unchanged.
///
/// # Examples
///
/// ```
/// use powerbb::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("line&#10;break&#x41;"), "line\nbreakA");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;");
/// assert_eq!(unescape_xml("&amp"), "&amp");
/// ```
pub fn unescape_xml(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut last = 0;

    for amp in memchr::memchr_iter(b'&', bytes) {
        if amp < last {
            continue;
        }
        let Some(semi) = memchr::memchr(b';', &bytes[amp..]).map(|p| amp + p) else {
            break;
        };
        let Some(decoded) = resolve_reference(&s[amp + 1..semi]) else {
            continue;
        };
        out.push_str(&s[last..amp]);
        out.push(decoded);
        last = semi + 1;
    }

    out.push_str(&s[last..]);
    out
}

/// Resolve the name between `&` and `;` into a character.
pub fn resolve_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        },
    }
}
