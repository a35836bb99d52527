use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    ApiRequest(ApiRequest),
    SearchResults {
        seq: u64,
        page: SearchPage,
    },
    Word {
        word: String,
        result: Option<WordWithEntries>,
    },
    StoreStatus(StoreStatus),
    StorePath(String),
    /// Directory handed to the file browser
    LocationOpened(String),
    /// Fraction of the store download completed, in `[0, 1]`
    FetchProgress(f64),
    FetchFinished(Result<(), String>),
    RequestFailed {
        request: &'static str,
        message: String,
    },
}

/// Operations the UI can ask the backend for
#[derive(Debug, Clone)]
pub enum ApiRequest {
    Search(SearchRequest),
    GetWord(String),
    StoreStatus,
    StorePath,
    FetchStore,
    OpenStoreLocation,
}

impl ApiRequest {
    pub fn name(&self) -> &'static str {
        match self {
            ApiRequest::Search(_) => "search",
            ApiRequest::GetWord(_) => "getWord",
            ApiRequest::StoreStatus => "storeStatus",
            ApiRequest::StorePath => "storePath",
            ApiRequest::FetchStore => "fetchStore",
            ApiRequest::OpenStoreLocation => "openStoreLocation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    StartsWith,
    Contains,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Caller-assigned sequence number, echoed back with the results
    #[serde(default)]
    pub seq: u64,
    pub query: String,
    pub mode: SearchMode,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub data: Vec<String>,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    pub id: i64,
    pub title: String,
    pub from_lang: String,
    pub to_lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Owning dictionary id
    pub id: i64,
    pub html: String,
    pub dictionary: Dictionary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordWithEntries {
    pub word: String,
    pub entries: Vec<WordEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub needs_setup: bool,
}
