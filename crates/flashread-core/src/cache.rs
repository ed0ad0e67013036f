//! Token streams cached by content hash.
//!
//! Reloading a history entry or uploading the same file twice reuses the stream
//! instead of tokenizing again. Entries are keyed by the SHA-256 of the text and the
//! least recently used one is dropped once the cache is full.

use crate::library::HISTORY_CAPACITY;
use crate::tokenizer::{TokenStream, tokenize};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use tracing::debug;

/// Room for every history entry plus the text currently being read.
pub const TOKEN_CACHE_CAPACITY: usize = HISTORY_CAPACITY + 1;

pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct TokenCache {
    entries: VecDeque<(String, TokenStream)>,
    capacity: usize,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::with_capacity(TOKEN_CACHE_CAPACITY)
    }
}

impl TokenCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stream for `text`, tokenizing only on a miss.
    pub fn tokens_for(&mut self, text: &str) -> TokenStream {
        let key = content_hash(text);
        if let Some(pos) = self.entries.iter().position(|(hash, _)| *hash == key) {
            if let Some(entry) = self.entries.remove(pos) {
                let stream = entry.1.clone();
                self.entries.push_front(entry);
                debug!(hash = %&key[..12], tokens = stream.len(), "Token cache hit");
                return stream;
            }
        }

        let stream = tokenize(text);
        debug!(hash = %&key[..12], tokens = stream.len(), "Token cache miss");
        self.entries.push_front((key, stream.clone()));
        self.entries.truncate(self.capacity);
        stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_hex_sha256() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_hash("same"), content_hash("same"));
        assert_ne!(content_hash("same"), content_hash("same "));
    }

    #[test]
    fn repeated_text_reuses_the_stream() {
        let mut cache = TokenCache::default();
        let first = cache.tokens_for("one two three");
        let second = cache.tokens_for("one two three");
        assert!(first.shares_buffer_with(&second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut cache = TokenCache::with_capacity(2);
        let a = cache.tokens_for("a");
        cache.tokens_for("b");
        cache.tokens_for("a");
        cache.tokens_for("c");
        assert_eq!(cache.len(), 2);

        let a_again = cache.tokens_for("a");
        assert!(a.shares_buffer_with(&a_again));
        let b_again = cache.tokens_for("b");
        assert_eq!(b_again.len(), 1);
        assert_eq!(cache.len(), 2);
    }
}
