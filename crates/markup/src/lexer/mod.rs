//! Streaming template-markup lexer.
//!
//! The lexer consumes input one chunk at a time and appends typed tokens to
//! an append-only output sequence. Chunk boundaries are invisible in the
//! token stream except where documented: an in-progress text run, tag name,
//! attribute key, or unquoted value is flushed as a complete token at the
//! end of every chunk, and a quoted value interrupted by a chunk boundary
//! or an injected value is emitted as `attr-part` fragments.
//!
//! Determinism contract:
//! - Output depends only on the sequence of `feed`/`inject` calls, never on
//!   wall clock or iteration order of anything unordered.
//! - Malformed input never fails: every (state, character) pair has a
//!   defined transition or no-op, so an unclosed quote or comment simply
//!   parks the lexer in that state.
//!
//! Only the state, the most recently opened tag name, and the lookback
//! characters survive between `feed` calls; the pending character buffer
//! never does.

mod escape;
mod states;


use std::mem::take;

use crate::token::{Payload, Token, trim_blank_edges};
use escape::decode_escape;
pub use states::LexState;

/// Counters maintained while lexing, cheap enough to keep always-on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LexerStats {
    pub chunks: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
}

/// Streaming lexer over chunked markup input.
///
/// `V` is the type of opaque values spliced in via [`Lexer::inject`]; it
/// defaults to `String` for purely textual use.
///
/// ```
/// use markup::{Lexer, Payload, Token};
///
/// let mut lexer = Lexer::<String>::new();
/// lexer.feed("<greeting name=\"world\">hi</greeting>");
/// let tokens = lexer.finish();
/// assert_eq!(tokens[0], Token::TagStart(Payload::Text("greeting".into())));
/// assert_eq!(tokens.len(), 7);
/// ```
pub struct Lexer<V = String> {
    state: LexState,
    /// Name of the most recently opened tag, including a leading `/` for
    /// closing tags. Drives raw-content entry and closing-tag matching.
    tag: String,
    /// Characters of the token currently being accumulated. Always empty
    /// between `feed` calls.
    pending: String,
    /// Last and second-to-last consumed characters. Persist across chunks
    /// so `/>` and `-->` are detected even when split at a chunk boundary.
    prev: Option<char>,
    prev2: Option<char>,
    tokens: Vec<Token<V>>,
    stats: LexerStats,
}

impl<V> Default for Lexer<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Lexer<V> {
    pub fn new() -> Self {
        Lexer {
            state: LexState::Text,
            tag: String::new(),
            pending: String::new(),
            prev: None,
            prev2: None,
            tokens: Vec::new(),
            stats: LexerStats::default(),
        }
    }

    /// Lex one chunk of input, appending tokens to the output sequence.
    ///
    /// Chunks may split anywhere except in the middle of an escape
    /// sequence's hex digits or in the tail of a raw-content closing tag;
    /// those two splits change the output (see the module docs).
    pub fn feed(&mut self, chunk: &str) {
        self.stats.chunks += 1;
        // A quoted value still open from a previous chunk (or interrupted
        // by an injected value) has already emitted fragments, so every
        // remaining piece of it must be a fragment too.
        let mut fragmented = matches!(
            self.state,
            LexState::AttrValueSingleQuoted | LexState::AttrValueDoubleQuoted
        );
        let mut i = 0usize;
        while i < chunk.len() {
            match self.state {
                LexState::RawContent => {
                    i = self.scan_raw(chunk, i);
                    continue;
                }
                LexState::Comment => {
                    i = self.scan_comment(chunk, i);
                    continue;
                }
                _ => {}
            }

            let ch = char_at(chunk, i);

            // Decoded characters are buffered (or dropped, in seek states)
            // without being re-inspected, so an escaped `<`, quote, or `>`
            // never acts as a delimiter.
            if ch == '\\' {
                i += self.decode_and_buffer(&chunk[i..]);
                continue;
            }

            // `>` closes the tag from any attribute sub-state; quoted
            // values and comments keep it literal.
            if ch == '>' && self.state.in_tag() {
                self.close_tag();
                self.note('>');
                i += 1;
                continue;
            }

            if self.state == LexState::Text && ch != '<' {
                i = self.scan_text_run(chunk, i);
                continue;
            }

            match self.state {
                LexState::Text => {
                    // ch is `<`
                    self.flush_text();
                    self.transition(LexState::TagOpenName);
                }
                LexState::TagOpenName => {
                    if ch == '-' && self.pending == "!-" {
                        // `<!--`
                        self.pending.clear();
                        self.transition(LexState::Comment);
                    } else if ch == '/' && self.pending.is_empty() {
                        // Leading slash of a closing tag is part of the name.
                        self.pending.push(ch);
                    } else if is_name_char(ch) {
                        self.pending.push(ch);
                    } else {
                        self.emit_tag_start();
                        self.transition(LexState::AttrSeek);
                    }
                }
                LexState::AttrSeek => {
                    if is_name_char(ch) {
                        self.transition(LexState::AttrKey);
                        self.pending.push(ch);
                    }
                }
                LexState::AttrKey => {
                    if ch == '=' {
                        let key = take(&mut self.pending);
                        self.emit(Token::AttrKey(key));
                        self.transition(LexState::AttrValueSeek);
                    } else if is_name_char(ch) {
                        self.pending.push(ch);
                    } else {
                        let key = take(&mut self.pending);
                        self.emit(Token::AttrKey(key));
                        self.transition(LexState::AttrKeyTrailingSpace);
                    }
                }
                LexState::AttrKeyTrailingSpace => {
                    if ch == '=' {
                        self.transition(LexState::AttrValueSeek);
                    } else if is_name_char(ch) {
                        self.transition(LexState::AttrKey);
                        self.pending.push(ch);
                    }
                }
                LexState::AttrValueSeek => {
                    if ch == '"' {
                        self.transition(LexState::AttrValueDoubleQuoted);
                    } else if ch == '\'' {
                        self.transition(LexState::AttrValueSingleQuoted);
                    } else if is_name_char(ch) {
                        self.transition(LexState::AttrValueUnquoted);
                        self.pending.push(ch);
                    }
                }
                LexState::AttrValueUnquoted => {
                    if is_name_char(ch) {
                        self.pending.push(ch);
                    } else {
                        let value = take(&mut self.pending);
                        self.emit(Token::AttrValue(Payload::Text(value)));
                        self.transition(LexState::AttrSeek);
                    }
                }
                LexState::AttrValueSingleQuoted | LexState::AttrValueDoubleQuoted => {
                    let quote = if self.state == LexState::AttrValueSingleQuoted {
                        '\''
                    } else {
                        '"'
                    };
                    if ch == quote {
                        let text = take(&mut self.pending);
                        if fragmented {
                            self.emit(Token::AttrPart(Payload::Text(text)));
                        } else {
                            self.emit(Token::AttrValue(Payload::Text(text)));
                        }
                        fragmented = false;
                        self.transition(LexState::AttrSeek);
                    } else {
                        self.pending.push(ch);
                    }
                }
                LexState::RawContent | LexState::Comment => unreachable!("dispatched above"),
            }

            self.note(ch);
            i += ch.len_utf8();
        }
        self.finalize_chunk();
    }

    /// Splice an opaque value into the token stream at the current logical
    /// position. The emitted token kind is a pure function of the current
    /// state; in states where a value is meaningless (mid-key, mid-unquoted
    /// value) this is a safe no-op.
    pub fn inject(&mut self, value: V) {
        debug_assert!(
            self.pending.is_empty(),
            "chunk finalization leaves no pending characters"
        );
        match self.state {
            LexState::Text | LexState::RawContent => {
                self.emit(Token::Text(Payload::Value(value)));
            }
            LexState::Comment => {
                self.emit(Token::Comment(Payload::Value(value)));
            }
            LexState::TagOpenName => {
                self.emit(Token::TagStart(Payload::Value(value)));
                self.transition(LexState::AttrSeek);
            }
            LexState::AttrSeek => {
                self.emit(Token::AttrMap(value));
            }
            LexState::AttrValueSeek => {
                self.emit(Token::AttrValue(Payload::Value(value)));
                self.transition(LexState::AttrSeek);
            }
            LexState::AttrValueSingleQuoted | LexState::AttrValueDoubleQuoted => {
                self.emit(Token::AttrPart(Payload::Value(value)));
            }
            LexState::AttrKey | LexState::AttrKeyTrailingSpace | LexState::AttrValueUnquoted => {}
        }
    }

    /// The accumulated token sequence with a single blank text token
    /// dropped from each end. Does not reset the lexer; a caller wanting a
    /// fresh stream creates a new instance.
    pub fn finish(&self) -> &[Token<V>] {
        trim_blank_edges(&self.tokens)
    }

    /// The raw accumulated token sequence, untrimmed.
    pub fn tokens(&self) -> &[Token<V>] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token<V>> {
        self.tokens
    }

    pub fn state(&self) -> LexState {
        self.state
    }

    pub fn stats(&self) -> LexerStats {
        self.stats
    }

    /// Scan raw element content up to and including the next `>`, watching
    /// for the remembered closing tag. On a match the cursor is rewound to
    /// the `<` that begins the closing sequence and the normal tag grammar
    /// reprocesses it. The suffix match is chunk-local: the pending buffer
    /// holds exactly the raw content scanned from this chunk, so a hit
    /// guarantees the rewind target is inside the chunk.
    fn scan_raw(&mut self, chunk: &str, start: usize) -> usize {
        let Some(offset) = memchr::memchr(b'>', &chunk.as_bytes()[start..]) else {
            self.push_run(&chunk[start..]);
            return chunk.len();
        };
        let gt = start + offset;
        self.push_run(&chunk[start..gt]);
        if ends_with_close_tag(&self.pending, &self.tag) {
            let close_len = self.tag.len() + 2;
            self.pending.truncate(self.pending.len() - close_len);
            self.flush_text();
            self.transition(LexState::Text);
            return gt - close_len;
        }
        self.pending.push('>');
        self.note('>');
        gt + 1
    }

    /// Scan comment content, discarding it, until a `>` preceded by two
    /// `-` characters. The lookback characters persist across chunks, so
    /// `-->` is recognized however the input is split.
    fn scan_comment(&mut self, chunk: &str, start: usize) -> usize {
        let mut i = start;
        while i < chunk.len() {
            let ch = char_at(chunk, i);
            i += ch.len_utf8();
            let closes = ch == '>' && self.prev == Some('-') && self.prev2 == Some('-');
            self.note(ch);
            if closes {
                self.transition(LexState::Text);
                return i;
            }
        }
        i
    }

    fn scan_text_run(&mut self, chunk: &str, start: usize) -> usize {
        let end = match memchr::memchr2(b'<', b'\\', &chunk.as_bytes()[start..]) {
            Some(offset) => start + offset,
            None => chunk.len(),
        };
        self.push_run(&chunk[start..end]);
        end
    }

    /// Decode one escape sequence and buffer the decoded character in
    /// accumulating states (seek states drop it). Returns the number of
    /// bytes consumed.
    fn decode_and_buffer(&mut self, rest: &str) -> usize {
        let escape = decode_escape(rest);
        if let Some(ch) = escape.ch {
            if self.state.accumulates() {
                self.pending.push(ch);
            }
            self.note(ch);
        }
        escape.len
    }

    /// Handle `>` in any tag-scope state: flush the in-progress name, key,
    /// or unquoted value, then emit `tag-end` and leave tag scope.
    fn close_tag(&mut self) {
        match self.state {
            LexState::TagOpenName => self.emit_tag_start(),
            LexState::AttrKey => {
                let key = take(&mut self.pending);
                self.emit(Token::AttrKey(key));
            }
            LexState::AttrValueUnquoted => {
                let value = take(&mut self.pending);
                self.emit(Token::AttrValue(Payload::Text(value)));
            }
            _ => {}
        }
        // `/>` self-closes unless the tag is itself a closing tag; the
        // self-close form never enters raw content.
        if self.prev == Some('/') && !self.tag.starts_with('/') {
            self.emit(Token::TagEnd("/".to_string()));
            self.transition(LexState::Text);
        } else {
            self.emit(Token::TagEnd(String::new()));
            let next = if is_raw_tag(&self.tag) {
                LexState::RawContent
            } else {
                LexState::Text
            };
            self.transition(next);
        }
        debug_assert!(self.pending.is_empty());
    }

    /// Emit the accumulated tag name and remember it for raw-content and
    /// closing-tag detection.
    fn emit_tag_start(&mut self) {
        let name = take(&mut self.pending);
        self.tag.clear();
        self.tag.push_str(&name);
        self.emit(Token::TagStart(Payload::Text(name)));
    }

    fn flush_text(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = take(&mut self.pending);
        self.emit(Token::Text(Payload::Text(text)));
    }

    /// Force the partially accumulated token to completion at the end of a
    /// chunk, so pending characters never survive as buffer state across
    /// calls. Only a quoted value or a comment may stay open across chunks.
    fn finalize_chunk(&mut self) {
        match self.state {
            LexState::Text | LexState::RawContent => self.flush_text(),
            LexState::Comment => {}
            LexState::TagOpenName => {
                if !self.pending.is_empty() {
                    self.emit_tag_start();
                    self.transition(LexState::AttrSeek);
                }
            }
            LexState::AttrSeek => {}
            LexState::AttrKey => {
                let key = take(&mut self.pending);
                self.emit(Token::AttrKey(key));
                self.transition(LexState::AttrSeek);
            }
            LexState::AttrKeyTrailingSpace => self.transition(LexState::AttrSeek),
            LexState::AttrValueSeek => {}
            LexState::AttrValueUnquoted => {
                let value = take(&mut self.pending);
                self.emit(Token::AttrValue(Payload::Text(value)));
                self.transition(LexState::AttrSeek);
            }
            LexState::AttrValueSingleQuoted | LexState::AttrValueDoubleQuoted => {
                if !self.pending.is_empty() {
                    let text = take(&mut self.pending);
                    self.emit(Token::AttrPart(Payload::Text(text)));
                }
            }
        }
        debug_assert!(self.pending.is_empty());
    }

    fn emit(&mut self, token: Token<V>) {
        self.stats.tokens_emitted += 1;
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "markup.lexer", "emit {}", token.kind().label());
        self.tokens.push(token);
    }

    fn transition(&mut self, next: LexState) {
        if self.state == next {
            return;
        }
        self.stats.state_transitions += 1;
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "markup.lexer", "state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn note(&mut self, ch: char) {
        self.prev2 = self.prev;
        self.prev = Some(ch);
    }

    /// Append a run of characters to the pending buffer and update the
    /// lookback characters from its tail.
    fn push_run(&mut self, run: &str) {
        if run.is_empty() {
            return;
        }
        self.pending.push_str(run);
        let mut rev = run.chars().rev();
        let last = rev.next();
        self.prev2 = rev.next().or(self.prev);
        self.prev = last;
    }
}

/// Separators are Unicode whitespace plus `"`, `'`, `=`, `/`; everything
/// else is eligible for tag names, attribute keys, and unquoted values.
/// `>` is intercepted before this classification applies in tag scope.
fn is_name_char(ch: char) -> bool {
    !ch.is_whitespace() && ch != '"' && ch != '\'' && ch != '=' && ch != '/'
}

fn is_raw_tag(name: &str) -> bool {
    matches!(name, "script" | "style")
}

fn ends_with_close_tag(pending: &str, tag: &str) -> bool {
    let close_len = tag.len() + 2;
    if pending.len() < close_len {
        return false;
    }
    let tail = &pending.as_bytes()[pending.len() - close_len..];
    tail[0] == b'<' && tail[1] == b'/' && &tail[2..] == tag.as_bytes()
}

fn char_at(chunk: &str, i: usize) -> char {
    debug_assert!(chunk.is_char_boundary(i));
    chunk[i..].chars().next().expect("cursor on a char boundary")
}
