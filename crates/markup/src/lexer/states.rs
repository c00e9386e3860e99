//! Lexer state machine definitions.
//!
//! The lexer is a flat finite-state machine: exactly one state is active at
//! any time and every (state, character) pair has a defined transition or
//! no-op, so malformed input can park the lexer in a state but never fail.

/// Current mode of the streaming lexer.
///
/// The state persists across `feed` calls; an unclosed quote or comment
/// simply leaves the lexer parked in the corresponding state, observable
/// through [`Lexer::state`](crate::Lexer::state).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexState {
    /// Ordinary character data outside any tag.
    Text,
    /// Opaque content of a raw element (`script`/`style`), passed through
    /// untokenized and undecoded until the matching closing tag.
    RawContent,
    /// Accumulating a tag name after `<`; a leading `/` is part of the name.
    TagOpenName,
    /// Between attributes, skipping separators.
    AttrSeek,
    /// Accumulating an attribute key.
    AttrKey,
    /// After a key, before knowing whether `=` follows.
    AttrKeyTrailingSpace,
    /// After `=`, before the first character of the value.
    AttrValueSeek,
    AttrValueUnquoted,
    AttrValueSingleQuoted,
    AttrValueDoubleQuoted,
    /// Inside `<!-- ... -->`; content is discarded.
    Comment,
}

impl LexState {
    /// States in which `>` closes the surrounding tag.
    pub(crate) fn in_tag(self) -> bool {
        matches!(
            self,
            LexState::TagOpenName
                | LexState::AttrSeek
                | LexState::AttrKey
                | LexState::AttrKeyTrailingSpace
                | LexState::AttrValueSeek
                | LexState::AttrValueUnquoted
        )
    }

    /// States whose in-progress token accumulates scanned characters.
    /// Escape-decoded characters are buffered in these states and dropped
    /// in the seek states, matching the scan-position semantics of the
    /// in-place rewrite this decoder replaces.
    pub(crate) fn accumulates(self) -> bool {
        matches!(
            self,
            LexState::Text
                | LexState::RawContent
                | LexState::TagOpenName
                | LexState::AttrKey
                | LexState::AttrValueUnquoted
                | LexState::AttrValueSingleQuoted
                | LexState::AttrValueDoubleQuoted
        )
    }
}
