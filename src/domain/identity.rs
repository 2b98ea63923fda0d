/// Derive the filesystem/row-safe identity key for a borrower name.
///
/// Lowercases, collapses each internal whitespace run to a single
/// underscore, then strips everything outside `[a-z0-9_-]`. The order
/// matters: `"A!! b"` becomes `"a_b"`, not `"ab"`. Distinct names may
/// collapse to the same key; callers treat that as a normal collision.
pub fn normalize_identity(raw_name: &str) -> String {
    let mut key = String::with_capacity(raw_name.len());
    let mut pending_separator = false;

    for ch in raw_name.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if pending_separator {
            key.push('_');
            pending_separator = false;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-' {
            key.push(ch);
        }
    }

    key
}
