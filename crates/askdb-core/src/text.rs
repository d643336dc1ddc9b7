//! Small text utilities shared across crates.

/// Strip a leading fenced-code marker and a trailing fence from model
/// output, then trim surrounding whitespace.
///
/// Language models asked for bare SQL still occasionally wrap it in a
/// markdown fence. Handles ```` ```sql ```` and bare ```` ``` ```` openers.
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```sql") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
