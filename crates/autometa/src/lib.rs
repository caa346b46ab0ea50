//! Public facade crate for `autometa`.
//!
//! Re-exports the record/configuration types from `autometa-core` and the text pipeline from
//! `autometa-text`, so hosts depend on a single crate.

pub use autometa_core::*;
pub use autometa_text::{
    describe, gate, generate, join_keywords, keywords_for, normalize, process, rank_keywords,
    score_keywords, tokenize, truncate_words, AutoMetaTags, Gate, ScoredKeyword, SkipReason,
};
