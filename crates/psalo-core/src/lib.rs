pub mod language;
pub mod preprocess;
pub mod sanitize;

pub use language::{LanguageFilter, LanguageSide, language_options};
pub use preprocess::{QueryGate, gate_query, normalize_query, to_palochka};
pub use sanitize::{LIKE_ESCAPE, decode_entities, escape_like};
