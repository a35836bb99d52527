use std::collections::HashSet;

use psalo_types::WordEntry;

/// Code for dictionaries covering both Circassian literary languages
pub const COMBINED_CIRCASSIAN: &str = "Ady/Kbd";

/// Human-readable names for the language codes used by dictionary metadata.
const DISPLAY_NAMES: [(&str, &str); 8] = [
    ("Ady", "West Circassian"),
    ("Kbd", "East Circassian"),
    (COMBINED_CIRCASSIAN, "West & East Circassian"),
    ("Ru", "Russian"),
    ("En", "English"),
    ("Tr", "Turkish"),
    ("Ar", "Arabic"),
    ("He", "Hebrew"),
];

pub fn display_name(code: &str) -> Option<&'static str> {
    DISPLAY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Falls back to the raw code for languages without a display name
pub fn display_name_or_code(code: &str) -> &str {
    display_name(code).unwrap_or(code)
}

/// Which side of a dictionary's language pair to look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSide {
    From,
    To,
}

impl LanguageSide {
    fn code(self, entry: &WordEntry) -> &str {
        match self {
            LanguageSide::From => &entry.dictionary.from_lang,
            LanguageSide::To => &entry.dictionary.to_lang,
        }
    }
}

/// Single-language codes a dictionary code stands for
fn expand_code(code: &str) -> Vec<&str> {
    if code == COMBINED_CIRCASSIAN {
        vec!["Ady", "Kbd"]
    } else {
        vec![code]
    }
}

/// Whether a dictionary code covers the selected language
pub fn code_matches(code: &str, selected: &str) -> bool {
    expand_code(code).contains(&selected)
}

/// Distinct languages on one side of `entries`, in first-seen order.
/// The combined Circassian code counts as both of its languages.
pub fn language_options(entries: &[WordEntry], side: LanguageSide) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = Vec::new();

    for entry in entries {
        for code in expand_code(side.code(entry)) {
            if seen.insert(code) {
                options.push(code.to_string());
            }
        }
    }

    options
}

/// Source and target language selection for a word's entries.
/// `None` on a side means every language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageFilter {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl LanguageFilter {
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn matches(&self, entry: &WordEntry) -> bool {
        let side_matches = |side: LanguageSide, selected: &Option<String>| {
            selected
                .as_deref()
                .is_none_or(|lang| code_matches(side.code(entry), lang))
        };

        side_matches(LanguageSide::From, &self.from) && side_matches(LanguageSide::To, &self.to)
    }

    /// Entries split into those shown and those filtered out, each in stored order
    pub fn partition<'a>(&self, entries: &'a [WordEntry]) -> (Vec<&'a WordEntry>, Vec<&'a WordEntry>) {
        entries.iter().partition(|entry| self.matches(entry))
    }
}
