/// Escapes text for interpolation into HTML, either as element content or as
/// a quoted attribute value. Nothing is ever unescaped, so `&amp;` comes back
/// as `&amp;amp;`.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("plain text", "plain text")]
    #[case("Привет, мир", "Привет, мир")]
    #[case("<script>alert(1)</script>", "&lt;script&gt;alert(1)&lt;/script&gt;")]
    #[case("a & b", "a &amp; b")]
    #[case("&amp;", "&amp;amp;")]
    #[case(r#"say "hi" it's"#, "say &quot;hi&quot; it&#39;s")]
    fn escapes_markup(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_html(input), expected);
    }

    #[test]
    fn output_has_no_raw_markup_characters() {
        let escaped = escape_html(r#"<a href="x" onclick='y'>&</a>"#);
        assert!(!escaped.contains(['<', '>', '"', '\'']));
    }
}
