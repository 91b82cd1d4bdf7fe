use std::sync::Arc;

use tracing::{debug, info};

use crate::data_models::{Block, BlockContent, TextBody};
use crate::error::Result;
use crate::notion::{BlockSource, PAGE_SIZE};

/// Pulls every child block of a page and flattens the text ones into a
/// Markdown-ish document.
pub struct ContentFetcher {
    source: Arc<dyn BlockSource>,
}

impl ContentFetcher {
    pub fn new(source: Arc<dyn BlockSource>) -> Self {
        Self { source }
    }

    /// Walks the cursor chain until the service reports no more pages.
    /// Any error ends the walk; partial results are dropped.
    pub async fn fetch_all_blocks(&self, page_id: &str) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut next_cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let response = self
                .source
                .list_children(page_id, next_cursor.as_deref(), PAGE_SIZE)
                .await?;
            pages += 1;
            debug!(page_id, pages, count = response.results.len(), "fetched block page");

            blocks.extend(response.results);
            if !response.has_more {
                break;
            }
            match response.next_cursor {
                Some(cursor) => next_cursor = Some(cursor),
                // has_more without a cursor would loop forever on the first page
                None => break,
            }
        }

        Ok(blocks)
    }

    pub async fn fetch_page_text(&self, page_id: &str) -> Result<String> {
        let blocks = self.fetch_all_blocks(page_id).await?;
        let content = render_blocks(&blocks);
        info!(
            page_id,
            blocks = blocks.len(),
            chars = content.len(),
            "rendered page content"
        );
        Ok(content)
    }
}

/// Renders blocks in order. Pure: same blocks, same string.
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks.iter().map(render_block).collect()
}

/// Renders a single block as `<prefix><first span>\n\n`.
///
/// Only the first rich-text span is used; later spans of the same block
/// (bold runs, links, mentions) are dropped. Unsupported block types and
/// blocks without text render as the empty string.
pub fn render_block(block: &Block) -> String {
    let (prefix, body): (&str, &TextBody) = match &block.content {
        BlockContent::Paragraph(body) => ("", body),
        BlockContent::Heading1(body) => ("# ", body),
        BlockContent::Heading2(body) => ("## ", body),
        BlockContent::Heading3(body) => ("### ", body),
        BlockContent::BulletedListItem(body) | BlockContent::NumberedListItem(body) => {
            ("- ", body)
        }
        BlockContent::Unsupported(_) => return String::new(),
    };

    match body.rich_text.first() {
        Some(span) => format!("{prefix}{}\n\n", span.plain_text),
        None => String::new(),
    }
}
