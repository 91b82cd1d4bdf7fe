use serde::{Deserialize, Serialize};

use crate::data_models::SearchResult;

/// Query string of the interactive page. Every field is optional so a bare
/// `GET /` renders the empty form.
#[derive(Debug, Deserialize, Default)]
pub struct AppQuery {
    #[serde(default)]
    pub page_id: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<bool>,
    #[serde(default)]
    pub graph: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub graph: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub category: Option<String>,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    pub processing_time_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_html: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PageContentResponse {
    pub page_id: String,
    pub content: String,
}
