use psalo_types::SearchMode;
use unicode_normalization::UnicodeNormalization;

/// Cyrillic palochka as typed on a Circassian keyboard.
pub const PALOCHKA: char = '\u{04C0}';

/// Placeholder the store keys use in place of the palochka.
pub const PALOCHKA_PLACEHOLDER: char = '1';

pub trait Preprocessor {
    // Default Circassian preprocessor
    fn process(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        // Composed forms so "й" typed as и + combining breve still matches
        let composed: String = text.nfc().collect();

        composed
            .chars()
            .map(|c| if c == PALOCHKA { PALOCHKA_PLACEHOLDER } else { c })
            .collect::<String>()
            .to_lowercase()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Fold user input into the form words are stored under.
pub fn normalize_query(text: &str) -> String {
    DefaultPreprocessor.process(text)
}

/// Display form of a stored word: placeholder digits become palochkas.
pub fn to_palochka(text: &str) -> String {
    text.replace(PALOCHKA_PLACEHOLDER, &PALOCHKA.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryGate {
    /// Nothing to search for
    Empty,
    /// Substring search on too few characters would match most of the store
    TooShort { min: usize },
    Ready,
}

/// Decide whether a normalized query is worth sending to the store.
pub fn gate_query(normalized: &str, mode: SearchMode, min_contains_chars: usize) -> QueryGate {
    if normalized.is_empty() {
        return QueryGate::Empty;
    }

    if mode == SearchMode::Contains && normalized.chars().count() < min_contains_chars {
        return QueryGate::TooShort {
            min: min_contains_chars,
        };
    }

    QueryGate::Ready
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palochka_becomes_placeholder_and_text_is_lowercased() {
        assert_eq!(normalize_query("Ӏэ"), "1э");
        assert_eq!(normalize_query("ПСЫ"), "псы");
        assert_eq!(normalize_query("КӀэ"), "к1э");
    }

    #[test]
    fn decomposed_input_is_composed() {
        assert_eq!(normalize_query("и\u{0306}"), "й");
    }

    #[test]
    fn wildcard_characters_pass_through() {
        assert_eq!(normalize_query("100%"), "100%");
        assert_eq!(normalize_query(""), "");
    }

    #[test]
    fn to_palochka_restores_display_form() {
        assert_eq!(to_palochka("1э"), "Ӏэ");
        assert_eq!(to_palochka("к1э"), "кӀэ");
        assert_eq!(to_palochka("псы"), "псы");
    }

    #[test]
    fn gate_rejects_empty_query() {
        assert_eq!(gate_query("", SearchMode::StartsWith, 3), QueryGate::Empty);
        assert_eq!(gate_query("", SearchMode::Contains, 3), QueryGate::Empty);
    }

    #[test]
    fn gate_counts_characters_not_bytes() {
        // two Cyrillic chars are four bytes
        assert_eq!(
            gate_query("псы", SearchMode::Contains, 3),
            QueryGate::Ready
        );
        assert_eq!(
            gate_query("пс", SearchMode::Contains, 3),
            QueryGate::TooShort { min: 3 }
        );
    }

    #[test]
    fn gate_allows_short_prefixes() {
        assert_eq!(gate_query("п", SearchMode::StartsWith, 3), QueryGate::Ready);
    }
}
