use autometa_core::Configuration;
use unicode_segmentation::UnicodeSegmentation;

/// Cut `text` to at most `max_chars` characters, ending on a word boundary when possible.
///
/// Returns the excerpt and whether anything was clipped. Lengths count `char`s, and the cut
/// always lands on an extended grapheme cluster boundary, so neither a multi-byte character nor
/// a multi-codepoint one (base letter plus combining mark, ZWJ emoji) is ever split. When the
/// window holds no whitespace at all (a single overlong word) the cut falls at the last grapheme
/// boundary within `max_chars` instead of dropping the word.
pub fn truncate_words(text: &str, max_chars: usize) -> (String, bool) {
    if max_chars == 0 {
        return (String::new(), text.chars().any(|c| !c.is_whitespace()));
    }
    // Byte offset of the first char past the window, if there is one.
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return (text.to_string(), false);
    };

    let mut end = 0;
    let mut boundary = None;
    for (i, g) in text.grapheme_indices(true) {
        if i + g.len() > cut {
            // The window ends between words when the overflowing cluster is whitespace.
            if starts_with_whitespace(g) {
                boundary = Some(i);
            }
            break;
        }
        if starts_with_whitespace(g) {
            boundary = Some(i);
        }
        end = i + g.len();
    }

    if let Some(b) = boundary {
        let t = text[..b].trim_end();
        if !t.is_empty() {
            return (t.to_string(), true);
        }
    }
    (text[..end].to_string(), true)
}

fn starts_with_whitespace(grapheme: &str) -> bool {
    grapheme.chars().next().is_some_and(char::is_whitespace)
}

/// Description text for normalized input: word-safe cut plus the ellipsis when clipped.
pub fn describe(text: &str, cfg: &Configuration) -> String {
    let (mut out, clipped) = truncate_words(text, cfg.meta_desc_length);
    if clipped && !out.is_empty() {
        out.push_str(&cfg.description_ellipsis);
    }
    out
}
