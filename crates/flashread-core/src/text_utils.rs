//! Punctuation helpers shared by pacing and chunk building.

pub fn is_sentence_end_mark(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

pub fn is_clause_break_mark(ch: char) -> bool {
    matches!(ch, ',' | ';')
}

/// True when any character of `text` ends a sentence.
pub fn contains_sentence_end(text: &str) -> bool {
    text.chars().any(is_sentence_end_mark)
}

/// True when any character of `text` is a comma or semicolon.
pub fn contains_clause_break(text: &str) -> bool {
    text.chars().any(is_clause_break_mark)
}

/// First `max_words` whitespace-separated words of `text`, joined by single spaces.
pub fn leading_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}
