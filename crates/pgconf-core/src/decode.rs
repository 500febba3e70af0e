//! Converts a raw `'...'` token into its logical string value (spec §4.2).

/// Decodes the raw text of a `STRING` token, quotes included.
///
/// Panics only cannot happen here (no fallible step); an input not actually
/// shaped like a quoted literal is decoded as best-effort, since the lexer
/// is the only caller and always hands this a `'...'`-shaped token.
pub fn decode_string(raw: &str) -> String {
    let body = raw.strip_prefix('\'').unwrap_or(raw);
    let body = body.strip_suffix('\'').unwrap_or(body);

    let mut out = String::with_capacity(body.len());
    let bytes: Vec<char> = body.chars().collect();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            '\\' if i + 1 < bytes.len() => {
                i += 1;
                let c = bytes[i];
                match c {
                    'b' => {
                        out.push('\u{8}');
                        i += 1;
                    }
                    'f' => {
                        out.push('\u{c}');
                        i += 1;
                    }
                    'n' => {
                        out.push('\n');
                        i += 1;
                    }
                    'r' => {
                        out.push('\r');
                        i += 1;
                    }
                    't' => {
                        out.push('\t');
                        i += 1;
                    }
                    '0'..='7' => {
                        let mut value: u32 = 0;
                        let mut consumed = 0;
                        while consumed < 3 && i < bytes.len() {
                            let d = bytes[i];
                            if !('0'..='7').contains(&d) {
                                break;
                            }
                            value = value * 8 + d.to_digit(8).unwrap();
                            i += 1;
                            consumed += 1;
                        }
                        out.push((value & 0xFF) as u8 as char);
                    }
                    other => {
                        out.push(other);
                        i += 1;
                    }
                }
            }
            '\'' if bytes.get(i + 1) == Some(&'\'') => {
                out.push('\'');
                i += 2;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Encodes a logical value into a single-quoted literal using the same
/// escape rules §4.2 decodes, for round-trip testing and for rendering a
/// canonicalized value back into a config file.
pub fn encode_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_plain_string() {
        assert_eq!(decode_string("'64MB'"), "64MB");
    }

    #[test]
    fn decodes_doubled_quote() {
        assert_eq!(decode_string("'it''s'"), "it's");
    }

    #[test]
    fn decodes_common_escapes() {
        assert_eq!(decode_string("'a\\tb'"), "a\tb");
        assert_eq!(decode_string("'a\\nb'"), "a\nb");
        assert_eq!(decode_string("'a\\rb'"), "a\rb");
    }

    #[test]
    fn decodes_octal_escape() {
        // \101 = 65 = 'A'
        assert_eq!(decode_string("'\\101'"), "A");
    }

    #[test]
    fn decodes_search_path_example() {
        // search_path = 'a\tb''c\101'  ->  a TAB b ' c A
        let decoded = decode_string("'a\\tb''c\\101'");
        assert_eq!(decoded, "a\tb'c\u{41}");
    }

    #[test]
    fn other_escape_is_literal() {
        assert_eq!(decode_string("'a\\xb'"), "axb");
    }

    #[test]
    fn round_trip_through_encode_decode() {
        for raw in ["hello", "a'b", "a\\b", "a\nb", "plain text 123"] {
            let encoded = encode_string(raw);
            let decoded = decode_string(&encoded);
            assert_eq!(decoded, raw);
        }
    }
}
