use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::data_models::BlockChildrenPage;
use crate::error::{Error, Result};

/// Largest page size the document service accepts.
pub const PAGE_SIZE: u32 = 100;

/// Something that can list the child blocks of a block or page, one page at a time.
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn list_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<BlockChildrenPage>;
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Document-service client over the public REST API.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: Url,
}

impl NotionClient {
    pub fn new(api_key: &str, base_url: &str, notion_version: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| Error::InvalidHeader("NOTION_API_KEY"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "notion-version",
            HeaderValue::from_str(notion_version)
                .map_err(|_| Error::InvalidHeader("NOTION_VERSION"))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base_url =
            Url::parse(base_url).map_err(|_| Error::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    /// `{base}/v1/blocks/{id}/children` with the id percent-encoded as a
    /// single path segment.
    fn children_url(&self, block_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v1", "blocks"])
            .push(block_id)
            .push("children");
        Ok(url)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.notion_api_key,
            &config.notion_base_url,
            &config.notion_version,
        )
    }
}

#[async_trait]
impl BlockSource for NotionClient {
    async fn list_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<BlockChildrenPage> {
        let url = self.children_url(block_id)?;
        let mut query: Vec<(&str, String)> = vec![("page_size", page_size.to_string())];
        if let Some(cursor) = start_cursor {
            query.push(("start_cursor", cursor.to_string()));
        }
        debug!(block_id, ?start_cursor, page_size, "listing block children");

        let res = self.client.get(url).query(&query).send().await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<NotionErrorBody>(&text) {
                Ok(body) => (body.code, body.message),
                Err(_) => (String::new(), text),
            };
            return Err(Error::Notion {
                status,
                code,
                message,
            });
        }

        Ok(res.json::<BlockChildrenPage>().await?)
    }
}
