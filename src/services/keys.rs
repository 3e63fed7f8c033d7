use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Turns a display label into a stable grouping key.
///
/// Accents are removed (NFD decomposition, combining marks dropped), every run of characters that
/// are not ASCII letters or digits becomes a single `-`, leading and trailing dashes are dropped
/// and the result is lower-cased. A label with no letters or digits yields an empty key.
pub fn sanitize_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !key.is_empty() {
                key.push('-');
            }
            pending_dash = false;
            key.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    key
}
