pub(crate) fn default_words_per_minute() -> u32 {
    200
}

pub(crate) fn default_chunk_size() -> usize {
    1
}

pub(crate) fn default_slow_at_punctuation() -> bool {
    true
}

pub(crate) fn default_break_at_sentence_end() -> bool {
    false
}

pub(crate) fn default_window_half_width() -> usize {
    40
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}
