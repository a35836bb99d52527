use std::env;

use serde::{Deserialize, Serialize};

fn default_page_size() -> u32 {
    50
}

fn default_min_contains_chars() -> usize {
    3
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Words per results page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Shortest query sent in "contains" mode
    #[serde(default = "default_min_contains_chars")]
    pub min_contains_chars: usize,
}

impl SearchConfig {
    pub fn new() -> Self {
        let page_size = env::var("PSALO_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &u32| *v > 0)
            .unwrap_or_else(default_page_size);

        Self {
            page_size,
            ..Self::default()
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            min_contains_chars: default_min_contains_chars(),
        }
    }
}
