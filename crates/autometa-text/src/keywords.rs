use crate::tokenize::tokenize;
use autometa_core::Configuration;
use serde::Serialize;
use std::collections::HashMap;

/// Separator used when keywords are stored as one string.
pub const KEYWORD_DELIMITER: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredKeyword {
    pub term: String,
    /// Occurrences among the filtered tokens.
    pub count: usize,
    /// Index of the first occurrence in the filtered token sequence.
    pub first_index: usize,
}

/// Filter, count and rank tokens; at most `cfg.max_keywords_count` results.
///
/// Order is descending count, then ascending first occurrence. First-occurrence indices are
/// unique, so the order is total and does not depend on map iteration order.
pub fn score_keywords(tokens: &[String], cfg: &Configuration) -> Vec<ScoredKeyword> {
    if cfg.max_keywords_count == 0 {
        return Vec::new();
    }
    let min_len = cfg.min_keyword_length.max(1);

    let mut stats: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut pos = 0usize;
    for t in tokens {
        if t.chars().count() < min_len || cfg.is_stop_word(t) {
            continue;
        }
        stats.entry(t.as_str()).or_insert((0, pos)).0 += 1;
        pos += 1;
    }

    let mut scored: Vec<ScoredKeyword> = stats
        .into_iter()
        .map(|(term, (count, first_index))| ScoredKeyword {
            term: term.to_string(),
            count,
            first_index,
        })
        .collect();
    scored.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.first_index.cmp(&b.first_index))
    });
    scored.truncate(cfg.max_keywords_count);
    scored
}

pub fn rank_keywords(tokens: &[String], cfg: &Configuration) -> Vec<String> {
    score_keywords(tokens, cfg)
        .into_iter()
        .map(|k| k.term)
        .collect()
}

/// Keywords for normalized text (tokenize, then rank).
pub fn keywords_for(text: &str, cfg: &Configuration) -> Vec<String> {
    rank_keywords(&tokenize(text), cfg)
}

pub fn join_keywords(keywords: &[String]) -> String {
    keywords.join(KEYWORD_DELIMITER)
}
