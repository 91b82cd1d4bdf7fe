use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
    pub max_characters: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContentsOptions {
    pub text: TextOptions,
    pub highlights: bool,
}

/// Body of a combined search-and-fetch-contents call.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchAndContentsRequest {
    pub query: String,
    pub use_autoprompt: bool,
    pub num_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub contents: ContentsOptions,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExaResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchAndContentsResponse {
    #[serde(default)]
    pub results: Vec<ExaResult>,
    #[serde(default)]
    pub autoprompt_string: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search_and_contents(
        &self,
        request: &SearchAndContentsRequest,
    ) -> Result<SearchAndContentsResponse>;
}

#[derive(Debug, Clone)]
pub struct ExaClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl ExaClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder().build()?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.exa_api_key, &config.exa_base_url)
    }
}

#[async_trait]
impl SearchBackend for ExaClient {
    async fn search_and_contents(
        &self,
        request: &SearchAndContentsRequest,
    ) -> Result<SearchAndContentsResponse> {
        debug!(query = %request.query, category = ?request.category, "exa search request");

        let res = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(Error::Exa { status, message });
        }

        let data: SearchAndContentsResponse = res.json().await?;
        debug!(
            count = data.results.len(),
            autoprompt = ?data.autoprompt_string,
            "exa search response"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_title_and_highlights_become_empty() {
        let result: ExaResult = serde_json::from_value(json!({
            "title": null,
            "url": "https://example.com",
            "highlights": null
        }))
        .unwrap();
        assert_eq!(result.title, "");
        assert!(result.highlights.is_empty());
    }

    #[test]
    fn test_missing_highlights_become_empty() {
        let result: ExaResult =
            serde_json::from_value(json!({"title": "T", "url": "https://example.com"})).unwrap();
        assert!(result.highlights.is_empty());
    }
}
