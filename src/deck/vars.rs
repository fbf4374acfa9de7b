//! `{{name}}` placeholder expansion.
//!
//! Names are ASCII letters, digits, `_` and `-`. A placeholder whose name
//! is not defined is left as written, and substituted values are not
//! expanded again.

use memchr::memmem;
use std::borrow::Cow;
use std::collections::BTreeMap;

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Expand every known placeholder in `text`.
pub fn expand<'a>(text: &'a str, variables: &BTreeMap<String, String>) -> Cow<'a, str> {
    if variables.is_empty() {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut out = String::new();
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = memmem::find(&bytes[pos..], b"{{") {
        let start = pos + offset;
        let name_start = start + 2;
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|b| is_name_byte(**b))
            .count();
        let name_end = name_start + name_len;

        if name_len == 0 || !bytes[name_end..].starts_with(b"}}") {
            pos = start + 1;
            continue;
        }

        if let Some(value) = variables.get(&text[name_start..name_end]) {
            out.push_str(&text[copied..start]);
            out.push_str(value);
            copied = name_end + 2;
        }
        pos = name_end + 2;
    }

    if copied == 0 {
        Cow::Borrowed(text)
    } else {
        out.push_str(&text[copied..]);
        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("client".to_string(), "Acme".to_string()),
            ("year".to_string(), "2025".to_string()),
            ("loop".to_string(), "{{client}}".to_string()),
        ])
    }

    #[test]
    fn test_expand_known() {
        assert_eq!(
            expand("Summary for {{client}} ({{year}})", &vars()),
            "Summary for Acme (2025)"
        );
    }

    #[test]
    fn test_unknown_and_malformed_left_intact() {
        let vars = vars();
        assert_eq!(expand("{{nobody}} and {{ client }}", &vars), "{{nobody}} and {{ client }}");
        assert_eq!(expand("{{client", &vars), "{{client");
        assert!(matches!(expand("plain", &vars), Cow::Borrowed(_)));
    }

    #[test]
    fn test_extra_brace_and_no_recursion() {
        let vars = vars();
        assert_eq!(expand("{{{client}}}", &vars), "{Acme}");
        assert_eq!(expand("{{loop}}", &vars), "{{client}}");
    }

    #[test]
    fn test_non_ascii_text() {
        assert_eq!(expand("Résumé — {{year}} ✓", &vars()), "Résumé — 2025 ✓");
    }
}
