//! Cleanup for hand-written or pasted deck JSON.
//!
//! Accepts the usual departures from strict JSON: a byte order mark,
//! Markdown code fences, `//` and `/* */` comments, trailing commas, and
//! Markdown-style backslash escapes such as `\_` or `\&`.

const VALID_ESCAPES: &[u8] = b"\"\\/bfnrtu";

/// Return `raw` rewritten into something strict JSON parsers accept.
pub fn clean(raw: &str) -> String {
    let text = raw.trim_start_matches('\u{feff}').trim();
    let text = strip_fences(text);
    let text = strip_comments_and_escapes(text);
    strip_trailing_commas(&text)
}

fn strip_fences(text: &str) -> &str {
    let mut text = text;
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Remove comments outside string literals, drop backslashes that do not
/// start a JSON escape and normalize line endings.
fn strip_comments_and_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            },
            '\\' => match chars.peek() {
                Some(&next) if next.is_ascii() && VALID_ESCAPES.contains(&(next as u8)) => {
                    out.push('\\');
                    out.push(next);
                    chars.next();
                },
                // Stray escape: keep the escaped character only
                _ => {},
            },
            '"' => {
                in_string = !in_string;
                out.push(c);
            },
            '/' if !in_string && chars.peek() == Some(&'/') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' || next == '\r' {
                        break;
                    }
                    chars.next();
                }
            },
            '/' if !in_string && chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            },
            _ => out.push(c),
        }
    }

    out
}

fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            },
            ',' => {
                let closes = text[i + 1..].trim_start().starts_with([']', '}']);
                if !closes {
                    out.push(c);
                }
            },
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn parse(raw: &str) -> Value {
        serde_json::from_str(&clean(raw)).unwrap()
    }

    #[test]
    fn test_fences_bom_and_comments() {
        let raw = "\u{feff}```json\n{\n  // deck\n  \"slides\": [] /* none yet */\n}\n```";
        assert_eq!(parse(raw), json!({"slides": []}));
    }

    #[test]
    fn test_trailing_commas() {
        let raw = "{\"a\": [1, 2, ], \"b\": {\"c\": 1,\n},}";
        assert_eq!(parse(raw), json!({"a": [1, 2], "b": {"c": 1}}));
    }

    #[test]
    fn test_strings_are_preserved() {
        let raw = r#"{"url": "http://example.com/a,]", "t": "a /* b */ c"}"#;
        assert_eq!(
            parse(raw),
            json!({"url": "http://example.com/a,]", "t": "a /* b */ c"})
        );
    }

    #[test]
    fn test_markdown_escapes_dropped() {
        let raw = r#"{"t": "V\&V and AI\_SE", "q": "say \"hi\"\n"}"#;
        assert_eq!(parse(raw), json!({"t": "V&V and AI_SE", "q": "say \"hi\"\n"}));
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(clean("{\r\n\"a\": 1\r\n}"), "{\n\"a\": 1\n}");
    }

    #[test]
    fn test_still_invalid() {
        assert!(serde_json::from_str::<Value>(&clean("{\"a\": }")).is_err());
    }
}
