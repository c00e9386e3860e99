//! Token model for the streaming lexer.

/// Token payload: decoded source text or an opaque caller-supplied value.
///
/// Injected values are never unescaped, trimmed, or otherwise inspected by
/// the lexer; they pass through exactly as handed in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload<V> {
    Text(String),
    Value(V),
}

impl<V> Payload<V> {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&V> {
        match self {
            Payload::Text(_) => None,
            Payload::Value(value) => Some(value),
        }
    }
}

/// Kind discriminant for [`Token`], mostly useful for dispatch tables and
/// trace output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    Comment,
    TagStart,
    TagEnd,
    AttrKey,
    AttrValue,
    AttrPart,
    AttrMap,
}

impl TokenKind {
    /// Stable lowercase label, used by snapshot formatting.
    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::Comment => "comment",
            TokenKind::TagStart => "tag-start",
            TokenKind::TagEnd => "tag-end",
            TokenKind::AttrKey => "attr-key",
            TokenKind::AttrValue => "attr-value",
            TokenKind::AttrPart => "attr-part",
            TokenKind::AttrMap => "attr-map",
        }
    }
}

/// One lexed token.
///
/// Determinism contract:
/// - Tokens are append-only and insertion order is document order.
/// - The variants that can carry an opaque injected value are exactly the
///   ones whose payload is a [`Payload`]; `TagEnd` and `AttrKey` are always
///   decoded text, `AttrMap` is always an injected value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<V = String> {
    /// Character data outside tags, or one opaque fragment of raw content.
    Text(Payload<V>),
    /// Only ever produced by value injection inside a comment; scanned
    /// comment bodies are discarded.
    Comment(Payload<V>),
    /// Tag name as scanned, including a leading `/` for closing tags. The
    /// `Value` form appears only while an attribute map is being composed.
    TagStart(Payload<V>),
    /// `"/"` for an explicit self-close, `""` otherwise.
    TagEnd(String),
    AttrKey(String),
    AttrValue(Payload<V>),
    /// One fragment of a quoted attribute value that was interrupted by a
    /// chunk boundary or an injected value; consumers concatenate fragments
    /// to recover the logical value.
    AttrPart(Payload<V>),
    /// A bulk set of attributes supplied as an opaque value.
    AttrMap(V),
}

impl<V> Token<V> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Text(_) => TokenKind::Text,
            Token::Comment(_) => TokenKind::Comment,
            Token::TagStart(_) => TokenKind::TagStart,
            Token::TagEnd(_) => TokenKind::TagEnd,
            Token::AttrKey(_) => TokenKind::AttrKey,
            Token::AttrValue(_) => TokenKind::AttrValue,
            Token::AttrPart(_) => TokenKind::AttrPart,
            Token::AttrMap(_) => TokenKind::AttrMap,
        }
    }
}

/// Drop a leading and a trailing blank text token from `tokens`.
///
/// A blank text token is a `Text` with a decoded payload that is empty or
/// all-whitespace; injected values are never considered blank. At most one
/// token is removed from each end, the check does not recurse, and the
/// result is a subslice of the input, so trimming an already-trimmed slice
/// returns it unchanged.
pub fn trim_blank_edges<V>(tokens: &[Token<V>]) -> &[Token<V>] {
    let mut start = 0usize;
    let mut end = tokens.len();
    if tokens.first().is_some_and(is_blank_text) {
        start += 1;
    }
    if end > start && tokens.last().is_some_and(is_blank_text) {
        end -= 1;
    }
    &tokens[start..end]
}

fn is_blank_text<V>(token: &Token<V>) -> bool {
    matches!(token, Token::Text(Payload::Text(text)) if text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{Payload, Token, trim_blank_edges};

    fn text(s: &str) -> Token<&'static str> {
        Token::Text(Payload::Text(s.to_string()))
    }

    #[test]
    fn trims_blank_text_from_both_edges() {
        let tokens = vec![text("\n  "), text("body"), text("  ")];
        let trimmed = trim_blank_edges(&tokens);
        assert_eq!(trimmed, &[text("body")]);
    }

    #[test]
    fn trims_at_most_one_token_per_edge() {
        let tokens = vec![text(" "), text("\t"), text("body")];
        let trimmed = trim_blank_edges(&tokens);
        assert_eq!(trimmed, &[text("\t"), text("body")]);
    }

    #[test]
    fn trimming_is_idempotent() {
        let tokens = vec![text(" "), text("body"), text(" ")];
        let once = trim_blank_edges(&tokens);
        let twice = trim_blank_edges(once);
        assert_eq!(once, twice);
    }

    #[test]
    fn single_blank_token_trims_to_empty() {
        let tokens = vec![text("   ")];
        assert!(trim_blank_edges(&tokens).is_empty());
    }

    #[test]
    fn injected_values_are_never_blank() {
        let tokens: Vec<Token<&str>> = vec![Token::Text(Payload::Value("  ")), text(" ")];
        let trimmed = trim_blank_edges(&tokens);
        assert_eq!(trimmed, &[Token::Text(Payload::Value("  "))]);
    }

    #[test]
    fn non_text_edges_are_untouched() {
        let tokens = vec![
            Token::<&str>::TagStart(Payload::Text("x".to_string())),
            Token::TagEnd(String::new()),
        ];
        assert_eq!(trim_blank_edges(&tokens).len(), 2);
    }
}
