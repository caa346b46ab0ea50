/// Lowercase word tokens in source order.
///
/// Punctuation is deleted rather than treated as a separator, so `don't` becomes `dont` and
/// `e-mail` becomes `email`. Only whitespace splits tokens.
///
/// "Kept" means `char::is_alphanumeric`, which is slightly wider than the letter and number
/// general categories: combining marks with the Alphabetic property (Devanagari vowel signs,
/// Hebrew points, ...) stay attached to their word instead of being stripped out of it.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.split_whitespace().map(str::to_string).collect()
}
