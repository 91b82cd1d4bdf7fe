use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel used when the search service returns no highlight for a result.
pub const NO_HIGHLIGHT: &str = "N/A";

/// One run of styled text inside a block. Only the plain text is used.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl RichText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            href: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBody {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

impl TextBody {
    pub fn new(spans: Vec<RichText>) -> Self {
        Self { rich_text: spans }
    }
}

/// Block payload, keyed by the service's `type` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Paragraph(TextBody),
    Heading1(TextBody),
    Heading2(TextBody),
    Heading3(TextBody),
    BulletedListItem(TextBody),
    NumberedListItem(TextBody),
    /// Any type we don't render (image, toggle, code, ...).
    Unsupported(String),
}

impl BlockContent {
    pub fn type_tag(&self) -> &str {
        match self {
            BlockContent::Paragraph(_) => "paragraph",
            BlockContent::Heading1(_) => "heading_1",
            BlockContent::Heading2(_) => "heading_2",
            BlockContent::Heading3(_) => "heading_3",
            BlockContent::BulletedListItem(_) => "bulleted_list_item",
            BlockContent::NumberedListItem(_) => "numbered_list_item",
            BlockContent::Unsupported(tag) => tag,
        }
    }

    fn from_tag(tag: &str, body: Option<Value>) -> Result<Self, serde_json::Error> {
        let text = |body: Option<Value>| -> Result<TextBody, serde_json::Error> {
            match body {
                Some(v) => serde_json::from_value(v),
                None => Ok(TextBody::default()),
            }
        };
        Ok(match tag {
            "paragraph" => BlockContent::Paragraph(text(body)?),
            "heading_1" => BlockContent::Heading1(text(body)?),
            "heading_2" => BlockContent::Heading2(text(body)?),
            "heading_3" => BlockContent::Heading3(text(body)?),
            "bulleted_list_item" => BlockContent::BulletedListItem(text(body)?),
            "numbered_list_item" => BlockContent::NumberedListItem(text(body)?),
            other => BlockContent::Unsupported(other.to_string()),
        })
    }
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// A read-only snapshot of one content block of a page.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: Option<String>,
    pub has_children: bool,
    pub content: BlockContent,
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(mut raw: RawBlock) -> Result<Self, Self::Error> {
        let body = raw.rest.remove(&raw.kind);
        Ok(Block {
            id: raw.id,
            has_children: raw.has_children,
            content: BlockContent::from_tag(&raw.kind, body)?,
        })
    }
}

impl Block {
    pub fn new(content: BlockContent) -> Self {
        Self {
            id: None,
            has_children: false,
            content,
        }
    }
}

/// One page of a "list children" answer. `results` and `has_more` are
/// required so any other object from the service fails to decode.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct BlockChildrenPage {
    pub results: Vec<Block>,
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub highlight: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_block_deserializes() {
        let block: Block = serde_json::from_value(json!({
            "object": "block",
            "id": "b1",
            "type": "heading_2",
            "has_children": false,
            "heading_2": {
                "rich_text": [{"type": "text", "plain_text": "Goals", "href": null}],
                "color": "default",
                "is_toggleable": false
            }
        }))
        .unwrap();

        assert_eq!(block.id.as_deref(), Some("b1"));
        assert_eq!(
            block.content,
            BlockContent::Heading2(TextBody::new(vec![RichText::plain("Goals")]))
        );
    }

    #[test]
    fn test_unknown_block_type_is_unsupported() {
        let block: Block = serde_json::from_value(json!({
            "type": "image",
            "image": {"type": "external", "external": {"url": "https://x/y.png"}}
        }))
        .unwrap();
        assert_eq!(block.content, BlockContent::Unsupported("image".into()));
        assert_eq!(block.content.type_tag(), "image");
    }

    #[test]
    fn test_missing_body_means_empty_text() {
        let block: Block = serde_json::from_value(json!({"type": "paragraph"})).unwrap();
        assert_eq!(block.content, BlockContent::Paragraph(TextBody::default()));
    }

    #[test]
    fn test_children_page_last_page() {
        let page: BlockChildrenPage = serde_json::from_value(
            json!({"object": "list", "results": [], "has_more": false, "next_cursor": null}),
        )
        .unwrap();
        assert!(page.results.is_empty());
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_non_list_object_is_not_a_children_page() {
        let res = serde_json::from_value::<BlockChildrenPage>(json!({
            "object": "block",
            "id": "abc",
            "type": "child_page",
            "child_page": {"title": "Notes"}
        }));
        assert!(res.is_err());
        let res = serde_json::from_value::<BlockChildrenPage>(json!({"object": "list", "results": []}));
        assert!(res.is_err(), "has_more is required");
    }
}
