use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub const DEFAULT_META_DESC_LENGTH: usize = 155;
pub const DEFAULT_MAX_KEYWORDS_COUNT: usize = 7;
pub const DEFAULT_MIN_KEYWORD_LENGTH: usize = 3;
pub const DEFAULT_DESCRIPTION_ELLIPSIS: &str = "...";

/// Common English function words, used when no stop words are configured.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "i", "you", "me", "my",
    "we", "our", "they", "them", "their", "this", "these", "those", "then", "than", "so", "if",
    "or", "but", "not",
];

pub fn default_stop_words() -> BTreeSet<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Parse a comma-separated stop word list.
///
/// Entries are trimmed and lowercased; blank entries are dropped. The result may be empty,
/// in which case callers fall back to [`default_stop_words`].
pub fn parse_stop_words(csv: &str) -> BTreeSet<String> {
    csv.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Resolved, immutable settings for one invocation.
///
/// Build it once at the host boundary (see [`MetaParams::resolve`]) and share it by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Minimum keyword length, in characters.
    pub min_keyword_length: usize,
    /// Maximum number of keywords. Zero disables keyword generation.
    pub max_keywords_count: usize,
    /// Target description length, in characters (excluding `description_ellipsis`).
    pub meta_desc_length: usize,
    /// Stop words, matched case-insensitively. [`parse_stop_words`] stores them lowercased,
    /// which keeps lookups on the fast path.
    pub stop_words: BTreeSet<String>,
    /// Appended to a description only when truncation dropped text.
    pub description_ellipsis: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            min_keyword_length: DEFAULT_MIN_KEYWORD_LENGTH,
            max_keywords_count: DEFAULT_MAX_KEYWORDS_COUNT,
            meta_desc_length: DEFAULT_META_DESC_LENGTH,
            stop_words: default_stop_words(),
            description_ellipsis: DEFAULT_DESCRIPTION_ELLIPSIS.to_string(),
        }
    }
}

impl Configuration {
    /// Case-insensitive stop word membership.
    pub fn is_stop_word(&self, word: &str) -> bool {
        if self.stop_words.contains(word) {
            return true;
        }
        let lc = word.to_lowercase();
        if lc != word && self.stop_words.contains(&lc) {
            return true;
        }
        // Entries a caller inserted with uppercase letters.
        self.stop_words
            .iter()
            .any(|w| w.chars().flat_map(char::to_lowercase).eq(lc.chars()))
    }
}

/// Raw, late-bound plugin parameters as a settings store hands them over.
///
/// Field names follow the stored parameter names. Numbers may arrive as JSON numbers or as
/// numeric strings; anything missing falls back to the defaults on [`MetaParams::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaParams {
    #[serde(deserialize_with = "de_opt_usize")]
    pub metadesc_length: Option<usize>,
    #[serde(deserialize_with = "de_opt_usize")]
    pub max_keywords_count: Option<usize>,
    #[serde(deserialize_with = "de_opt_usize")]
    pub min_keyword_length: Option<usize>,
    pub stop_words: Option<String>,
    pub description_ellipsis: Option<String>,
}

impl MetaParams {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::InvalidParams(e.to_string()))
    }

    /// Read a params JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&txt)
    }

    /// Layer `over` on top of `self`: any value set in `over` wins.
    pub fn merge(self, over: MetaParams) -> MetaParams {
        MetaParams {
            metadesc_length: over.metadesc_length.or(self.metadesc_length),
            max_keywords_count: over.max_keywords_count.or(self.max_keywords_count),
            min_keyword_length: over.min_keyword_length.or(self.min_keyword_length),
            stop_words: over.stop_words.or(self.stop_words),
            description_ellipsis: over.description_ellipsis.or(self.description_ellipsis),
        }
    }

    pub fn resolve(&self) -> Configuration {
        let stop_words = self
            .stop_words
            .as_deref()
            .map(parse_stop_words)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_stop_words);
        Configuration {
            min_keyword_length: self
                .min_keyword_length
                .unwrap_or(DEFAULT_MIN_KEYWORD_LENGTH)
                .max(1),
            max_keywords_count: self
                .max_keywords_count
                .unwrap_or(DEFAULT_MAX_KEYWORDS_COUNT),
            meta_desc_length: self
                .metadesc_length
                .unwrap_or(DEFAULT_META_DESC_LENGTH)
                .max(1),
            stop_words,
            description_ellipsis: self
                .description_ellipsis
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION_ELLIPSIS.to_string()),
        }
    }
}

fn de_opt_usize<'de, D>(d: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    let v = Option::<serde_json::Value>::deserialize(d)?;
    match v {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                Ok(Some(u as usize))
            } else if n.as_i64().is_some() {
                // Negative counts mean "nothing".
                Ok(Some(0))
            } else {
                Err(D::Error::custom(format!("expected an integer, got {n}")))
            }
        }
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.parse::<i64>() {
                Ok(n) => Ok(Some(n.max(0) as usize)),
                Err(_) => Err(D::Error::custom(format!("expected an integer, got {s:?}"))),
            }
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected an integer, got {other}"
        ))),
    }
}

pub const CONTEXT_ARTICLE: &str = "com_content.article";
pub const CONTEXT_FORM: &str = "com_content.form";

/// Content contexts the hook acts on. Everything else is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentContext {
    Article,
    Form,
}

impl ContentContext {
    pub fn parse(context: &str) -> Option<Self> {
        match context {
            CONTEXT_ARTICLE => Some(Self::Article),
            CONTEXT_FORM => Some(Self::Form),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Article => CONTEXT_ARTICLE,
            Self::Form => CONTEXT_FORM,
        }
    }
}

/// The slice of a content item the hook reads and writes.
///
/// Unknown fields are carried through untouched so a host can round-trip its whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introtext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulltext: Option<String>,
    /// Meta description.
    #[serde(default)]
    pub metadesc: String,
    /// Meta keywords, comma separated.
    #[serde(default)]
    pub metakey: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContentRecord {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Parse(e.to_string()))
    }

    /// A metadata field may be filled in only while it holds nothing but whitespace.
    pub fn is_settable(field: &str) -> bool {
        field.trim().is_empty()
    }

    pub fn description_settable(&self) -> bool {
        Self::is_settable(&self.metadesc)
    }

    pub fn keywords_settable(&self) -> bool {
        Self::is_settable(&self.metakey)
    }

    /// Intro text when it has content, else full text, else empty. Always trimmed.
    pub fn source_text(&self) -> &str {
        [self.introtext.as_deref(), self.fulltext.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

/// Values computed by one hook invocation. `None` means "leave the field alone".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMeta {
    pub description: Option<String>,
    pub keywords: Option<String>,
}

impl GeneratedMeta {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.keywords.is_none()
    }

    /// Write generated values into `record`, never replacing a non-empty field.
    pub fn apply_to(&self, record: &mut ContentRecord) {
        if let Some(d) = self.description.as_deref().filter(|d| !d.is_empty()) {
            if record.description_settable() {
                record.metadesc = d.to_string();
            }
        }
        if let Some(k) = self.keywords.as_deref().filter(|k| !k.is_empty()) {
            if record.keywords_settable() {
                record.metakey = k.to_string();
            }
        }
    }
}

/// A synchronous before-save hook on content records.
pub trait BeforeSaveHook: Send + Sync {
    fn name(&self) -> &'static str;
    /// Inspect and possibly update `record` before the host persists it.
    fn before_save(&self, context: &str, record: &mut ContentRecord) -> GeneratedMeta;
}
