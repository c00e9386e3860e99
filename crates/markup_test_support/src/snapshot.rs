//! Token snapshot rendering and split-insensitive normalization.

use std::fmt::Display;

use markup::{Payload, Token};
use serde::Deserialize;

/// Render tokens one per line as `kind payload`, with injected values
/// wrapped in `{...}` to keep them distinct from equal-looking text.
pub fn snapshot_lines<V: Display>(tokens: &[Token<V>]) -> Vec<String> {
    tokens.iter().map(snapshot_line).collect()
}

fn snapshot_line<V: Display>(token: &Token<V>) -> String {
    let label = token.kind().label();
    match token {
        Token::Text(payload)
        | Token::Comment(payload)
        | Token::TagStart(payload)
        | Token::AttrValue(payload)
        | Token::AttrPart(payload) => match payload {
            Payload::Text(text) => format!("{label} {text}"),
            Payload::Value(value) => format!("{label} {{{value}}}"),
        },
        Token::TagEnd(text) | Token::AttrKey(text) => format!("{label} {text}"),
        Token::AttrMap(value) => format!("{label} {{{value}}}"),
    }
}

/// Normalize away the documented chunk-boundary artifacts: adjacent text
/// tokens merge, and a run of all-text value fragments collapses back into
/// a single attribute value. Runs containing injected fragments are left
/// untouched since they are not a split artifact.
pub fn coalesce<V: Clone>(tokens: &[Token<V>]) -> Vec<Token<V>> {
    let mut out: Vec<Token<V>> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Text(Payload::Text(first)) => {
                let mut merged = first.clone();
                i += 1;
                while let Some(Token::Text(Payload::Text(next))) = tokens.get(i) {
                    merged.push_str(next);
                    i += 1;
                }
                out.push(Token::Text(Payload::Text(merged)));
            }
            Token::AttrPart(_) => {
                let run_start = i;
                while matches!(tokens.get(i), Some(Token::AttrPart(_))) {
                    i += 1;
                }
                let run = &tokens[run_start..i];
                let all_text = run
                    .iter()
                    .all(|token| matches!(token, Token::AttrPart(Payload::Text(_))));
                if all_text {
                    let mut merged = String::new();
                    for token in run {
                        if let Token::AttrPart(Payload::Text(text)) = token {
                            merged.push_str(text);
                        }
                    }
                    out.push(Token::AttrValue(Payload::Text(merged)));
                } else {
                    out.extend(run.iter().cloned());
                }
            }
            other => {
                out.push(other.clone());
                i += 1;
            }
        }
    }
    out
}

/// One golden fixture: named input chunks and the expected token lines.
#[derive(Debug, Deserialize)]
pub struct GoldenCase {
    pub name: String,
    pub chunks: Vec<String>,
    pub tokens: Vec<Vec<String>>,
}

impl GoldenCase {
    pub fn load_all(json: &str) -> Vec<GoldenCase> {
        serde_json::from_str(json).expect("golden fixture file is valid JSON")
    }

    /// Expected tokens as snapshot lines; each fixture token is a
    /// `[kind, payload]` pair.
    pub fn expected_lines(&self) -> Vec<String> {
        self.tokens
            .iter()
            .map(|pair| {
                assert_eq!(pair.len(), 2, "token entry must be [kind, payload]");
                format!("{} {}", pair[0], pair[1])
            })
            .collect()
    }
}
