// HTML entity decoding for translation values (spec §4.D step 1).
//
// A fixed, closed table — hand-rolled rather than pulled from a crate,
// since the table itself is a spec invariant, not an ambient concern.

const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&nbsp;", "\u{00A0}"),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&hellip;", "\u{2026}"),
    ("&copy;", "\u{00A9}"),
    ("&reg;", "\u{00AE}"),
    ("&trade;", "\u{2122}"),
];

#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_owned();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    'outer: while !rest.is_empty() {
        if rest.starts_with('&') {
            for (entity, replacement) in ENTITIES {
                if let Some(tail) = rest.strip_prefix(entity) {
                    out.push_str(replacement);
                    rest = tail;
                    continue 'outer;
                }
            }
        }
        let mut chars = rest.chars();
        let c = chars.next().expect("rest is non-empty");
        out.push(c);
        rest = chars.as_str();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_fixed_entity() {
        assert_eq!(decode_entities("A &amp; B"), "A & B");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&quot;quoted&quot;"), "\"quoted\"");
        assert_eq!(decode_entities("it&apos;s"), "it's");
        assert_eq!(decode_entities("it&#39;s"), "it's");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{00A0}b");
        assert_eq!(decode_entities("1950&ndash;2000"), "1950\u{2013}2000");
        assert_eq!(decode_entities("foo&mdash;bar"), "foo\u{2014}bar");
        assert_eq!(decode_entities("wait&hellip;"), "wait\u{2026}");
        assert_eq!(decode_entities("&copy;2026"), "\u{00A9}2026");
        assert_eq!(decode_entities("&reg;"), "\u{00AE}");
        assert_eq!(decode_entities("&trade;"), "\u{2122}");
    }

    #[test]
    fn leaves_plain_text_and_unknown_ampersands_untouched() {
        assert_eq!(decode_entities("plain text"), "plain text");
        assert_eq!(decode_entities("Q&A"), "Q&A");
    }

    #[test]
    fn fast_path_skips_strings_without_ampersand() {
        assert_eq!(decode_entities("no entities here"), "no entities here");
    }
}
