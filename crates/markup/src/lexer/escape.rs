//! Backslash escape decoding.
//!
//! `\xHH` and `\uHHHH` decode to the character named by the hex digits; any
//! other backslash is deleted and the character after it taken literally,
//! which is how a literal `<`, quote, or backslash is written in contexts
//! where those are special. Decoding never applies inside raw content or
//! comments, and never to injected values.

/// One decoded escape at the start of a slice beginning with `\`.
pub(crate) struct Escape {
    /// Decoded character, or `None` for a lone backslash at the end of a
    /// chunk (the backslash is simply dropped).
    pub ch: Option<char>,
    /// Bytes consumed from the input, including the backslash.
    pub len: usize,
}

pub(crate) fn decode_escape(rest: &str) -> Escape {
    debug_assert!(rest.starts_with('\\'), "decode_escape called off a backslash");
    let tail = &rest[1..];
    let bytes = tail.as_bytes();
    if bytes.first() == Some(&b'x')
        && let Some(code) = parse_hex(&bytes[1..], 2)
    {
        return Escape {
            ch: Some(from_code(code)),
            len: 1 + 1 + 2,
        };
    }
    if bytes.first() == Some(&b'u')
        && let Some(code) = parse_hex(&bytes[1..], 4)
    {
        return Escape {
            ch: Some(from_code(code)),
            len: 1 + 1 + 4,
        };
    }
    match tail.chars().next() {
        Some(ch) => Escape {
            ch: Some(ch),
            len: 1 + ch.len_utf8(),
        },
        None => Escape { ch: None, len: 1 },
    }
}

fn parse_hex(bytes: &[u8], width: usize) -> Option<u32> {
    if bytes.len() < width {
        return None;
    }
    let mut code = 0u32;
    for &byte in &bytes[..width] {
        code = code * 16 + (byte as char).to_digit(16)?;
    }
    Some(code)
}

/// Codes outside the Unicode scalar range (the surrogate block) decode to
/// U+FFFD rather than failing.
fn from_code(code: u32) -> char {
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::decode_escape;

    #[test]
    fn decodes_two_digit_hex() {
        let escape = decode_escape("\\x40rest");
        assert_eq!(escape.ch, Some('@'));
        assert_eq!(escape.len, 4);
    }

    #[test]
    fn decodes_four_digit_hex() {
        let escape = decode_escape("\\u0040rest");
        assert_eq!(escape.ch, Some('@'));
        assert_eq!(escape.len, 6);
    }

    #[test]
    fn hex_digits_are_case_insensitive() {
        assert_eq!(decode_escape("\\x3C").ch, Some('<'));
        assert_eq!(decode_escape("\\x3c").ch, Some('<'));
    }

    #[test]
    fn short_hex_falls_back_to_literal() {
        // `\x4Z` is not a hex escape; the backslash is deleted and the `x`
        // is taken literally.
        let escape = decode_escape("\\x4Z");
        assert_eq!(escape.ch, Some('x'));
        assert_eq!(escape.len, 2);
    }

    #[test]
    fn bare_backslash_takes_next_char_literally() {
        let escape = decode_escape("\\<tag");
        assert_eq!(escape.ch, Some('<'));
        assert_eq!(escape.len, 2);
    }

    #[test]
    fn backslash_before_multibyte_char() {
        let escape = decode_escape("\\é");
        assert_eq!(escape.ch, Some('é'));
        assert_eq!(escape.len, 1 + 'é'.len_utf8());
    }

    #[test]
    fn trailing_backslash_is_dropped() {
        let escape = decode_escape("\\");
        assert_eq!(escape.ch, None);
        assert_eq!(escape.len, 1);
    }

    #[test]
    fn surrogate_code_decodes_to_replacement_char() {
        let escape = decode_escape("\\ud800");
        assert_eq!(escape.ch, Some(char::REPLACEMENT_CHARACTER));
        assert_eq!(escape.len, 6);
    }
}
