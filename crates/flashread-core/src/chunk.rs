//! Selects the tokens shown together at a cursor position.

use crate::config::PlaybackConfig;
use crate::text_utils::contains_sentence_end;
use crate::tokenizer::{Token, TokenStream};

/// Text shown when there is nothing to read.
pub const EMPTY_PLACEHOLDER: &str = "Ready?";

/// Tokens displayed at `cursor`.
///
/// Takes up to `chunk_size` tokens from the cursor. With break-at-sentence-end on
/// and a chunk size above one, the chunk stops after the first token carrying a
/// sentence-ending mark.
pub fn build_chunk<'a>(
    stream: &'a TokenStream,
    cursor: usize,
    config: &PlaybackConfig,
) -> &'a [Token] {
    let chunk_size = config.chunk_size.max(1);
    let slice = stream.slice(cursor..cursor.saturating_add(chunk_size));
    if !(config.break_at_sentence_end && chunk_size > 1) {
        return slice;
    }
    match slice
        .iter()
        .position(|token| contains_sentence_end(&token.text))
    {
        Some(idx) => &slice[..=idx],
        None => slice,
    }
}

/// Display text for a chunk, or the placeholder when the chunk is empty.
pub fn chunk_text(chunk: &[Token]) -> String {
    if chunk.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }
    chunk
        .iter()
        .map(|token| token.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn config(chunk_size: usize, break_at_sentence_end: bool) -> PlaybackConfig {
        PlaybackConfig {
            chunk_size,
            break_at_sentence_end,
            ..PlaybackConfig::default()
        }
    }

    fn texts(chunk: &[Token]) -> Vec<&str> {
        chunk.iter().map(|token| token.text.as_str()).collect()
    }

    #[test]
    fn truncates_after_sentence_end() {
        let stream = tokenize("The cat sat. Then left");
        let chunk = build_chunk(&stream, 0, &config(3, true));
        assert_eq!(texts(chunk), vec!["The", "cat", "sat."]);

        let chunk = build_chunk(&stream, 0, &config(5, true));
        assert_eq!(texts(chunk), vec!["The", "cat", "sat."]);
    }

    #[test]
    fn leaves_chunk_whole_without_sentence_end_or_policy() {
        let stream = tokenize("one two three. four");
        assert_eq!(
            texts(build_chunk(&stream, 0, &config(2, true))),
            vec!["one", "two"]
        );
        assert_eq!(
            texts(build_chunk(&stream, 1, &config(3, false))),
            vec!["two", "three.", "four"]
        );
    }

    #[test]
    fn single_word_chunks_ignore_break_policy() {
        let stream = tokenize("Stop. Go");
        assert_eq!(
            texts(build_chunk(&stream, 0, &config(1, true))),
            vec!["Stop."]
        );
    }

    #[test]
    fn clips_at_stream_end_and_never_exceeds_chunk_size() {
        let stream = tokenize("a b c d e");
        for chunk_size in 1..=5 {
            for cursor in 0..stream.len() {
                let chunk = build_chunk(&stream, cursor, &config(chunk_size, false));
                assert!(chunk.len() <= chunk_size);
                assert!(cursor + chunk.len() <= stream.len());
            }
        }
        assert_eq!(texts(build_chunk(&stream, 4, &config(3, false))), vec!["e"]);
        assert!(build_chunk(&stream, 9, &config(3, false)).is_empty());
    }

    #[test]
    fn empty_stream_renders_placeholder() {
        let stream = tokenize("");
        let chunk = build_chunk(&stream, 0, &config(3, true));
        assert!(chunk.is_empty());
        assert_eq!(chunk_text(chunk), EMPTY_PLACEHOLDER);
    }
}
