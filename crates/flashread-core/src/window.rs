//! Bounded slice of the token stream around the cursor.
//!
//! Only tokens within `half_width` of the cursor are materialized. Each token
//! segment carries its stream index so a click resolves to an exact token, and the
//! whitespace between neighbouring tokens is copied verbatim from the source.

use crate::tokenizer::TokenStream;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Segment {
    Token {
        index: usize,
        text: String,
        in_chunk: bool,
    },
    Whitespace {
        text: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct RenderWindow {
    pub segments: Vec<Segment>,
    pub ellipsis_before: bool,
    pub ellipsis_after: bool,
}

impl RenderWindow {
    /// Stream indices of the token segments, in order.
    pub fn token_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Token { index, .. } => Some(*index),
            Segment::Whitespace { .. } => None,
        })
    }
}

/// Render tokens `[cursor - half_width, cursor + half_width)` of `stream`, which must
/// have been produced from `text`.
pub fn render_window(
    text: &str,
    stream: &TokenStream,
    cursor: usize,
    half_width: usize,
    chunk_size: usize,
) -> RenderWindow {
    let len = stream.len();
    let start = cursor.saturating_sub(half_width).min(len);
    let end = cursor.saturating_add(half_width).min(len);
    let chunk = cursor..cursor.saturating_add(chunk_size.max(1));

    let mut segments = Vec::with_capacity(end.saturating_sub(start) * 2);
    let mut previous_end: Option<usize> = None;
    for (offset, token) in stream.slice(start..end).iter().enumerate() {
        if let Some(gap_start) = previous_end {
            let gap = text.get(gap_start..token.start).unwrap_or(" ");
            segments.push(Segment::Whitespace {
                text: gap.to_string(),
            });
        }
        let index = start + offset;
        segments.push(Segment::Token {
            index,
            text: token.text.clone(),
            in_chunk: chunk.contains(&index),
        });
        previous_end = Some(token.end);
    }

    RenderWindow {
        segments,
        ellipsis_before: start > 0,
        ellipsis_after: end < len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use pretty_assertions::assert_eq;

    fn token(index: usize, text: &str, in_chunk: bool) -> Segment {
        Segment::Token {
            index,
            text: text.to_string(),
            in_chunk,
        }
    }

    fn space(text: &str) -> Segment {
        Segment::Whitespace {
            text: text.to_string(),
        }
    }

    #[test]
    fn keeps_source_whitespace_between_tokens() {
        let text = "one  two\nthree";
        let stream = tokenize(text);
        let window = render_window(text, &stream, 0, 40, 1);
        assert_eq!(
            window,
            RenderWindow {
                segments: vec![
                    token(0, "one", true),
                    space("  "),
                    token(1, "two", false),
                    space("\n"),
                    token(2, "three", false),
                ],
                ellipsis_before: false,
                ellipsis_after: false,
            }
        );
    }

    #[test]
    fn bounds_the_window_and_marks_ellipses() {
        let text = "a b c d e f g h i j";
        let stream = tokenize(text);
        let window = render_window(text, &stream, 5, 2, 2);
        assert_eq!(window.token_indices().collect::<Vec<_>>(), vec![3, 4, 5, 6]);
        assert!(window.ellipsis_before);
        assert!(window.ellipsis_after);

        let in_chunk: Vec<usize> = window
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Token {
                    index,
                    in_chunk: true,
                    ..
                } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(in_chunk, vec![5, 6]);
    }

    #[test]
    fn ellipses_only_appear_when_tokens_are_hidden() {
        let text = "a b c";
        let stream = tokenize(text);
        let window = render_window(text, &stream, 0, 3, 1);
        assert!(!window.ellipsis_before);
        assert!(!window.ellipsis_after);

        let window = render_window(text, &stream, 2, 1, 1);
        assert_eq!(window.token_indices().collect::<Vec<_>>(), vec![1, 2]);
        assert!(window.ellipsis_before);
        assert!(!window.ellipsis_after);
    }

    #[test]
    fn duplicate_words_keep_distinct_indices() {
        let text = "the cat saw the dog";
        let stream = tokenize(text);
        let window = render_window(text, &stream, 3, 10, 1);
        let the_indices: Vec<usize> = window
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Token { index, text, .. } if text == "the" => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(the_indices, vec![0, 3]);
    }

    #[test]
    fn empty_stream_renders_nothing() {
        let stream = tokenize("");
        assert_eq!(render_window("", &stream, 0, 40, 1), RenderWindow::default());
    }
}
