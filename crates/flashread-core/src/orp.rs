//! Optimal recognition point: the character the reader's eye anchors on.

use serde::Serialize;
use ts_rs::TS;

/// Anchor index for a word, from its character length alone, clamped into the word.
pub fn orp_index(word: &str) -> usize {
    let len = word.chars().count();
    let index = match len {
        0..=4 => 1,
        5..=9 => 2,
        10..=13 => 3,
        _ => 4,
    };
    index.min(len.saturating_sub(1))
}

/// A word split around its anchor character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct EmphasisSplit {
    pub before: String,
    pub anchor: String,
    pub after: String,
}

impl EmphasisSplit {
    pub fn of(word: &str) -> Self {
        let anchor_idx = orp_index(word);
        let mut before = String::new();
        let mut anchor = String::new();
        let mut after = String::new();
        for (idx, ch) in word.chars().enumerate() {
            match idx.cmp(&anchor_idx) {
                std::cmp::Ordering::Less => before.push(ch),
                std::cmp::Ordering::Equal => anchor.push(ch),
                std::cmp::Ordering::Greater => after.push(ch),
            }
        }
        Self {
            before,
            anchor,
            after,
        }
    }
}
