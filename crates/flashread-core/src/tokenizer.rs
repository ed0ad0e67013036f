//! Whitespace tokenizer.
//!
//! A single left-to-right pass over the source records every word together with
//! its byte span, so each stream index maps back to exactly one span even when the
//! same word appears many times. No normalization happens here: punctuation stays
//! attached to its word for pacing and chunk breaking.

use serde::Serialize;
use std::ops::Range;
use std::sync::Arc;
use ts_rs::TS;

/// One word of the source text with its half-open byte span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Ordered, immutable token sequence. Cloning shares the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Arc<[Token]>,
}

impl Default for TokenStream {
    fn default() -> Self {
        Self {
            tokens: Arc::from(Vec::new()),
        }
    }
}

impl TokenStream {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Index of the last token, or `None` for an empty stream.
    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    /// Clamp `index` into `[0, N-1]`; an empty stream always yields 0.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.last_index().unwrap_or(0))
    }

    /// Tokens in `range`, clipped to the stream bounds.
    pub fn slice(&self, range: Range<usize>) -> &[Token] {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        &self.tokens[start..end]
    }

    #[cfg(test)]
    pub(crate) fn shares_buffer_with(&self, other: &TokenStream) -> bool {
        Arc::ptr_eq(&self.tokens, &other.tokens)
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self {
            tokens: Arc::from(tokens),
        }
    }
}

/// Whitespace, plus the byte-order mark some editors leave at the start of a file.
fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{feff}'
}

/// Split `text` on runs of whitespace. Whitespace-only input yields an empty stream.
pub fn tokenize(text: &str) -> TokenStream {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if is_separator(ch) {
            if let Some(start) = word_start.take() {
                tokens.push(Token {
                    text: text[start..idx].to_string(),
                    start,
                    end: idx,
                });
            }
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }

    if let Some(start) = word_start {
        tokens.push(Token {
            text: text[start..].to_string(),
            start,
            end: text.len(),
        });
    }

    TokenStream::from(tokens)
}

/// Map a character offset in `text` to the index of the word it falls in.
///
/// `stream` must be the tokenization of `text`. The offset counts characters, not
/// bytes, and is clamped to the end of the text. Counts the words that start before
/// it and returns the last of them, so an offset inside a word (or in the whitespace
/// after it) selects that word. Offsets before the first word select index 0. Only
/// used when no explicit token index is available.
pub fn token_index_at_offset(text: &str, stream: &TokenStream, offset: usize) -> usize {
    let byte_offset = text
        .char_indices()
        .nth(offset)
        .map_or(text.len(), |(idx, _)| idx);
    let preceding = stream
        .as_slice()
        .partition_point(|token| token.start < byte_offset);
    stream.clamp_index(preceding.saturating_sub(1))
}
