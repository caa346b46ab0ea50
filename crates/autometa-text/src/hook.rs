use crate::keywords::{join_keywords, keywords_for};
use crate::normalize::normalize;
use crate::truncate::describe;
use autometa_core::{
    BeforeSaveHook, Configuration, ContentContext, ContentRecord, GeneratedMeta, MetaParams,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnrecognizedContext,
    NoSourceText,
}

/// Outcome of the precondition check, evaluated once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Skip(SkipReason),
    /// Trimmed source text (still marked up).
    Proceed(String),
}

pub fn gate(context: &str, record: &ContentRecord) -> Gate {
    if ContentContext::parse(context).is_none() {
        return Gate::Skip(SkipReason::UnrecognizedContext);
    }
    let source = record.source_text();
    if source.is_empty() {
        return Gate::Skip(SkipReason::NoSourceText);
    }
    Gate::Proceed(source.to_string())
}

/// Compute whatever metadata `record` is missing. Never touches `record`.
pub fn generate(context: &str, record: &ContentRecord, cfg: &Configuration) -> GeneratedMeta {
    let source = match gate(context, record) {
        Gate::Proceed(s) => s,
        Gate::Skip(reason) => {
            tracing::debug!(context = %context, reason = ?reason, "meta generation skipped");
            return GeneratedMeta::default();
        }
    };

    let want_description = record.description_settable();
    let want_keywords = record.keywords_settable();
    if !want_description && !want_keywords {
        return GeneratedMeta::default();
    }

    let text = normalize(&source);
    if text.is_empty() {
        tracing::debug!(context = %context, "source text is empty after markup stripping");
        return GeneratedMeta::default();
    }

    let mut out = GeneratedMeta::default();
    if want_description {
        let d = describe(&text, cfg);
        if !d.is_empty() {
            out.description = Some(d);
        }
    }
    if want_keywords {
        let k = keywords_for(&text, cfg);
        if !k.is_empty() {
            out.keywords = Some(join_keywords(&k));
        }
    }
    tracing::debug!(
        context = %context,
        description = out.description.is_some(),
        keywords = out.keywords.is_some(),
        "meta generated"
    );
    out
}

/// Fill in empty metadata fields and hand the record back.
pub fn process(context: &str, mut record: ContentRecord, cfg: &Configuration) -> ContentRecord {
    generate(context, &record, cfg).apply_to(&mut record);
    record
}

/// Before-save hook that generates meta descriptions and keywords for content items.
#[derive(Debug, Clone, Default)]
pub struct AutoMetaTags {
    config: Configuration,
}

impl AutoMetaTags {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }

    pub fn from_params(params: &MetaParams) -> Self {
        Self::new(params.resolve())
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}

impl BeforeSaveHook for AutoMetaTags {
    fn name(&self) -> &'static str {
        "autometatags"
    }

    fn before_save(&self, context: &str, record: &mut ContentRecord) -> GeneratedMeta {
        let g = generate(context, record, &self.config);
        g.apply_to(record);
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(intro: &str) -> ContentRecord {
        ContentRecord {
            introtext: Some(intro.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn unrecognized_context_is_a_no_op() {
        let r = article("<p>Plenty of article text to work with.</p>");
        assert_eq!(
            gate("com_content.category", &r),
            Gate::Skip(SkipReason::UnrecognizedContext)
        );
        let out = process("com_content.category", r.clone(), &Configuration::default());
        assert_eq!(out, r);
    }

    #[test]
    fn missing_body_skips() {
        let r = ContentRecord::default();
        assert_eq!(
            gate("com_content.article", &r),
            Gate::Skip(SkipReason::NoSourceText)
        );
        let r = ContentRecord {
            introtext: Some("  ".to_string()),
            fulltext: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            gate("com_content.form", &r),
            Gate::Skip(SkipReason::NoSourceText)
        );
    }

    #[test]
    fn falls_back_to_fulltext() {
        let r = ContentRecord {
            introtext: Some(String::new()),
            fulltext: Some(" <p>Full body</p> ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            gate("com_content.article", &r),
            Gate::Proceed("<p>Full body</p>".to_string())
        );
    }

    #[test]
    fn fills_both_empty_fields() {
        let r = article("<p>The quick brown fox jumps over the lazy dog. The fox is quick.</p>");
        let cfg = Configuration {
            max_keywords_count: 3,
            ..Default::default()
        };
        let out = process("com_content.article", r, &cfg);
        assert_eq!(
            out.metadesc,
            "The quick brown fox jumps over the lazy dog. The fox is quick."
        );
        assert_eq!(out.metakey, "quick, fox, brown");
    }

    #[test]
    fn only_empty_fields_are_updated() {
        let mut r = article("Rust ownership rules keep memory safe without garbage collection.");
        r.metadesc = "Written by hand".to_string();
        let out = process("com_content.article", r, &Configuration::default());
        assert_eq!(out.metadesc, "Written by hand");
        assert!(!out.metakey.is_empty());
        assert!(out.metakey.contains("rust"));
    }

    #[test]
    fn filled_fields_short_circuit() {
        let mut r = article("Some body");
        r.metadesc = "d".to_string();
        r.metakey = "k".to_string();
        let g = generate("com_content.article", &r, &Configuration::default());
        assert!(g.is_empty());
    }

    #[test]
    fn markup_only_body_generates_nothing() {
        let r = article("<p>&nbsp;</p><img src=\"x.png\">");
        let g = generate("com_content.article", &r, &Configuration::default());
        assert!(g.is_empty());
        let out = process("com_content.article", r.clone(), &Configuration::default());
        assert_eq!(out, r);
    }

    #[test]
    fn empty_keyword_result_leaves_field_untouched() {
        let r = article("It is as it was.");
        let out = process("com_content.article", r, &Configuration::default());
        assert_eq!(out.metadesc, "It is as it was.");
        assert_eq!(out.metakey, "");
    }

    #[test]
    fn long_body_is_truncated_with_ellipsis() {
        let body = "word ".repeat(100);
        let cfg = Configuration {
            meta_desc_length: 22,
            ..Default::default()
        };
        let out = process("com_content.form", article(&body), &cfg);
        assert_eq!(out.metadesc, "word word word word...");
    }

    #[test]
    fn hook_writes_and_reports_generated_values() {
        let hook = AutoMetaTags::from_params(&MetaParams {
            max_keywords_count: Some(2),
            ..Default::default()
        });
        assert_eq!(hook.name(), "autometatags");
        assert_eq!(hook.config().max_keywords_count, 2);

        let mut r = article("<h1>Borrow checker</h1><p>The borrow checker checks borrows.</p>");
        let g = hook.before_save("com_content.article", &mut r);
        assert_eq!(g.keywords.as_deref(), Some("borrow, checker"));
        assert_eq!(r.metakey, "borrow, checker");
        assert_eq!(
            r.metadesc,
            "Borrow checker The borrow checker checks borrows."
        );
    }

    #[test]
    fn hook_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AutoMetaTags>();

        let hook = std::sync::Arc::new(AutoMetaTags::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let hook = hook.clone();
                std::thread::spawn(move || {
                    let mut r = article(&format!("Thread number {i} writes thread text"));
                    hook.before_save("com_content.article", &mut r);
                    r.metakey
                })
            })
            .collect();
        for h in handles {
            let kw = h.join().expect("thread panicked");
            assert!(kw.starts_with("thread"), "got {kw:?}");
        }
    }
}
