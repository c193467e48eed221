use std::borrow::Cow;

/// XML 1.0 `Char` production; terms occasionally carry stray control codes.
fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

pub fn sanitize_xml_text(text: &str) -> String {
    text.chars().filter(|&c| is_valid_xml_char(c)).collect()
}

pub fn sanitized_char_count(text: &str) -> usize {
    text.chars().filter(|&c| is_valid_xml_char(c)).count()
}

/// Escapes text for element content and attribute values, dropping chars
/// XML cannot carry. Borrows when nothing needs rewriting.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    let clean = text
        .chars()
        .all(|c| is_valid_xml_char(c) && !matches!(c, '&' | '<' | '>' | '"' | '\''));
    if clean {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars().filter(|&c| is_valid_xml_char(c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::{escape_xml, sanitize_xml_text};

    #[test]
    fn plain_terms_are_borrowed() {
        assert!(matches!(
            escape_xml("Fracture of femur (disorder)"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn concrete_string_quotes_are_escaped() {
        assert_eq!(escape_xml("\"oral\""), "&quot;oral&quot;");
        assert_eq!(escape_xml("Salt & pepper <2>"), "Salt &amp; pepper &lt;2&gt;");
    }

    #[test]
    fn control_chars_are_dropped() {
        assert_eq!(sanitize_xml_text("Hip\u{0007} joint\tpain"), "Hip joint\tpain");
        assert_eq!(escape_xml("a\u{000C}'b'"), "a&apos;b&apos;");
    }
}
