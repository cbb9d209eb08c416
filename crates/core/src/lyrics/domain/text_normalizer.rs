/// Normalizes text for matching: lowercase, punctuation replaced by spaces,
/// whitespace collapsed to single spaces.
///
/// Letters and digits of any script are kept, as is `_`, so Hangul or kana
/// lines survive normalization intact.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out
}
