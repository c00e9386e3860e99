//! Streaming lexer for template-flavored markup.
//!
//! Converts chunked markup text into a flat sequence of typed tokens: tag
//! boundaries, attribute keys and values, text runs. Backslash escapes are
//! decoded outside raw and comment regions, `script`/`style` content passes
//! through opaque, and callers can splice non-textual values into the
//! stream between chunks. Designed to sit at the front of a template
//! compiler; tree building and interpolation resolution happen downstream.

mod lexer;
mod token;

pub use lexer::{LexState, Lexer, LexerStats};
pub use token::{Payload, Token, TokenKind, trim_blank_edges};
