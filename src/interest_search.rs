use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::data_models::{NO_HIGHLIGHT, SearchResult};
use crate::error::Result;
use crate::exa::{ContentsOptions, ExaResult, SearchAndContentsRequest, SearchBackend, TextOptions};

pub const NUM_RESULTS: u32 = 5;
pub const MAX_CONTENT_CHARACTERS: u32 = 1000;

/// Category filters offered by the selector. The search itself forwards any
/// string as-is; this list only drives what the page offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Github,
    Videos,
    News,
    ResearchPaper,
    Pdf,
    Tweet,
    Company,
    PersonalSite,
    LinkedinProfile,
    FinancialReport,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Github,
        Category::Videos,
        Category::News,
        Category::ResearchPaper,
        Category::Pdf,
        Category::Tweet,
        Category::Company,
        Category::PersonalSite,
        Category::LinkedinProfile,
        Category::FinancialReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Github => "github",
            Category::Videos => "videos",
            Category::News => "news",
            Category::ResearchPaper => "research paper",
            Category::Pdf => "pdf",
            Category::Tweet => "tweet",
            Category::Company => "company",
            Category::PersonalSite => "personal site",
            Category::LinkedinProfile => "linkedin profile",
            Category::FinancialReport => "financial report",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown category {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

pub struct InterestSearch {
    backend: Arc<dyn SearchBackend>,
}

impl InterestSearch {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub fn build_request(query: &str, category: Option<&str>) -> SearchAndContentsRequest {
        SearchAndContentsRequest {
            query: query.to_string(),
            use_autoprompt: true,
            num_results: NUM_RESULTS,
            category: category.map(str::to_string),
            contents: ContentsOptions {
                text: TextOptions {
                    max_characters: MAX_CONTENT_CHARACTERS,
                },
                highlights: true,
            },
        }
    }

    /// Runs one search and returns at most five results in service ranking order.
    /// The caller is responsible for rejecting empty queries.
    pub async fn search(&self, query: &str, category: Option<&str>) -> Result<Vec<SearchResult>> {
        info!(query, ?category, "searching interests");
        let request = Self::build_request(query, category);
        let response = self.backend.search_and_contents(&request).await?;

        let results: Vec<SearchResult> = response
            .results
            .into_iter()
            .take(NUM_RESULTS as usize)
            .map(to_search_result)
            .collect();

        info!(query, count = results.len(), "search complete");
        Ok(results)
    }
}

fn to_search_result(result: ExaResult) -> SearchResult {
    let highlight = result
        .highlights
        .into_iter()
        .next()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| NO_HIGHLIGHT.to_string());
    SearchResult {
        title: result.title,
        url: result.url,
        highlight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
        assert_eq!("GitHub".parse::<Category>().unwrap(), Category::Github);
        assert!("substack".parse::<Category>().is_err());
    }

    #[test]
    fn test_request_shape() {
        let request = InterestSearch::build_request("rust async", Some("github"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "query": "rust async",
                "useAutoprompt": true,
                "numResults": 5,
                "category": "github",
                "contents": {"text": {"maxCharacters": 1000}, "highlights": true}
            })
        );
    }

    #[test]
    fn test_request_without_category_omits_field() {
        let request = InterestSearch::build_request("rust", None);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("category").is_none());
    }
}
