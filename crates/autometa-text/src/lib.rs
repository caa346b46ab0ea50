//! Text distillation for content metadata.
//!
//! Pipeline: marked-up body → [`normalize`] → plain text, then
//! [`truncate::describe`] for the description and [`tokenize`] → [`keywords::rank_keywords`]
//! for the keywords. [`hook::AutoMetaTags`] wires both into a before-save hook.
//!
//! Everything here is pure and synchronous.

pub mod hook;
pub mod keywords;
pub mod normalize;
pub mod tokenize;
pub mod truncate;

pub use hook::{gate, generate, process, AutoMetaTags, Gate, SkipReason};
pub use keywords::{join_keywords, keywords_for, rank_keywords, score_keywords, ScoredKeyword};
pub use normalize::normalize;
pub use tokenize::tokenize;
pub use truncate::{describe, truncate_words};

#[cfg(test)]
mod tests {
    use super::*;
    use autometa_core::{Configuration, ContentRecord};
    use proptest::prelude::*;

    fn cfg_strategy() -> impl Strategy<Value = Configuration> {
        (
            1usize..8,
            0usize..10,
            1usize..200,
            prop::collection::btree_set("[a-z]{1,4}", 0..10),
        )
            .prop_map(|(min_len, max_kw, desc_len, stop_words)| Configuration {
                min_keyword_length: min_len,
                max_keywords_count: max_kw,
                meta_desc_length: desc_len,
                stop_words,
                ..Default::default()
            })
    }

    #[test]
    fn scenario_short_article_end_to_end() {
        let record = ContentRecord {
            introtext: Some(
                "<p>This is a very long article body text that keeps going</p>".to_string(),
            ),
            ..Default::default()
        };
        let cfg = Configuration {
            meta_desc_length: 20,
            description_ellipsis: String::new(),
            ..Default::default()
        };
        let out = process("com_content.article", record, &cfg);
        assert_eq!(out.metadesc, "This is a very long");
        assert_eq!(out.metakey, "very, long, article, body, text, keeps, going");
    }

    proptest! {
        #[test]
        fn truncation_is_identity_when_short(s in any::<String>(), extra in 0usize..20) {
            let n = s.chars().count();
            let (out, clipped) = truncate_words(&s, n + extra);
            prop_assert_eq!(out, s);
            prop_assert!(!clipped);
        }

        #[test]
        fn truncation_is_bounded_prefix(s in any::<String>(), max in 0usize..64) {
            let (out, _) = truncate_words(&s, max);
            prop_assert!(out.chars().count() <= max);
            // A prefix means no character was split or invented.
            prop_assert!(s.starts_with(&out));
        }

        #[test]
        fn description_bound_includes_ellipsis_on_top(s in "[a-z ]{0,300}", max in 1usize..120) {
            let cfg = Configuration { meta_desc_length: max, ..Default::default() };
            let text = normalize(&s);
            let d = describe(&text, &cfg);
            prop_assert!(d.chars().count() <= max + cfg.description_ellipsis.chars().count());
        }

        #[test]
        fn keyword_invariants_hold(text in "[A-Za-z ,.]{0,400}", cfg in cfg_strategy()) {
            let kws = keywords_for(&text, &cfg);
            prop_assert!(kws.len() <= cfg.max_keywords_count);
            let mut seen = std::collections::BTreeSet::new();
            for k in &kws {
                prop_assert!(k.chars().count() >= cfg.min_keyword_length);
                prop_assert!(!cfg.is_stop_word(k));
                prop_assert_eq!(k.clone(), k.to_lowercase());
                prop_assert!(seen.insert(k.clone()), "duplicate keyword {}", k);
            }
        }

        #[test]
        fn pipeline_is_deterministic(s in any::<String>(), cfg in cfg_strategy()) {
            let record = ContentRecord { introtext: Some(s), ..Default::default() };
            let a = generate("com_content.article", &record, &cfg);
            let b = generate("com_content.article", &record, &cfg);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn normalized_text_is_collapsed(s in any::<String>()) {
            let n = normalize(&s);
            prop_assert!(!n.starts_with(' '));
            prop_assert!(!n.ends_with(' '));
            prop_assert!(!n.contains("  "));
            prop_assert!(!n.contains('\n'));
        }
    }
}
