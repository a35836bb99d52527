//! String helpers applied between the store and its callers.
//!
//! Entry markup is stored with a handful of HTML entities escaped; it is
//! decoded here before reaching the display surface. User queries are
//! escaped before being embedded in a `LIKE` pattern.

/// Escape character declared in every `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Entity substitutions in application order. `&amp;` must stay last so
/// `&amp;lt;` decodes to the literal `&lt;` rather than `<`.
const ENTITIES: [(&str, &str); 7] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&#x2F;", "/"),
    ("&amp;", "&"),
];

/// Decode the fixed entity set used by the store. Each substitution runs
/// exactly once over the output of the previous one.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, raw)| acc.replace(entity, raw))
}

/// Escape `LIKE` wildcards so the value matches literally under
/// `ESCAPE '\'`. The backslash itself is escaped first.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
