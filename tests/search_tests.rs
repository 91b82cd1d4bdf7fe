use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use glean::data_models::NO_HIGHLIGHT;
use glean::error::Error;
use glean::exa::{ExaResult, SearchAndContentsRequest, SearchAndContentsResponse, SearchBackend};
use glean::interest_search::{InterestSearch, MAX_CONTENT_CHARACTERS, NUM_RESULTS};

mod test_helpers {
    use super::*;

    pub struct FakeBackend {
        response: std::result::Result<Vec<ExaResult>, u16>,
        pub requests: Mutex<Vec<SearchAndContentsRequest>>,
    }

    impl FakeBackend {
        pub fn returning(results: Vec<ExaResult>) -> Self {
            Self {
                response: Ok(results),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                response: Err(status),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for FakeBackend {
        async fn search_and_contents(
            &self,
            request: &SearchAndContentsRequest,
        ) -> glean::Result<SearchAndContentsResponse> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.response {
                Ok(results) => Ok(SearchAndContentsResponse {
                    results: results.clone(),
                    autoprompt_string: Some(format!("Here is {}", request.query)),
                }),
                Err(status) => Err(Error::Exa {
                    status: reqwest::StatusCode::from_u16(*status).unwrap(),
                    message: "quota exceeded".to_string(),
                }),
            }
        }
    }

    pub fn exa_result(title: &str, url: &str, highlights: &[&str]) -> ExaResult {
        ExaResult {
            title: title.to_string(),
            url: url.to_string(),
            highlights: highlights.iter().map(|h| h.to_string()).collect(),
            text: Some("body text".to_string()),
            score: Some(0.5),
            published_date: None,
            author: None,
        }
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_first_highlight_or_sentinel() -> Result<()> {
    let backend = Arc::new(FakeBackend::returning(vec![
        exa_result("Async Rust", "https://a.example", &["first", "second"]),
        exa_result("Tokio Guide", "https://b.example", &[]),
    ]));
    let search = InterestSearch::new(backend);

    let results = search.search("async rust", None).await?;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Async Rust");
    assert_eq!(results[0].url, "https://a.example");
    assert_eq!(results[0].highlight, "first");
    assert_eq!(results[1].highlight, NO_HIGHLIGHT);
    Ok(())
}

#[tokio::test]
async fn test_empty_first_highlight_becomes_sentinel() -> Result<()> {
    let backend = Arc::new(FakeBackend::returning(vec![exa_result(
        "Blank",
        "https://c.example",
        &[""],
    )]));
    let search = InterestSearch::new(backend);

    let results = search.search("blank", None).await?;

    assert_eq!(results[0].highlight, NO_HIGHLIGHT);
    Ok(())
}

#[tokio::test]
async fn test_never_more_than_five_results_in_service_order() -> Result<()> {
    let many: Vec<ExaResult> = (0..8)
        .map(|i| exa_result(&format!("Result {i}"), &format!("https://{i}.example"), &["h"]))
        .collect();
    let backend = Arc::new(FakeBackend::returning(many));
    let search = InterestSearch::new(backend);

    let results = search.search("x", None).await?;

    assert_eq!(results.len(), NUM_RESULTS as usize);
    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Result 0", "Result 1", "Result 2", "Result 3", "Result 4"]
    );
    for r in &results {
        assert!(!r.highlight.is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn test_request_parameters_and_category_pass_through() -> Result<()> {
    let backend = Arc::new(FakeBackend::returning(vec![]));
    let search = InterestSearch::new(backend.clone());

    let results = search.search("rust web frameworks", Some("substack")).await?;
    assert!(results.is_empty());

    let requests = backend.requests.lock().unwrap();
    assert_eq!(requests.len(), 1, "exactly one upstream call per search");
    let req = &requests[0];
    assert_eq!(req.query, "rust web frameworks");
    assert!(req.use_autoprompt);
    assert_eq!(req.num_results, NUM_RESULTS);
    assert_eq!(req.category.as_deref(), Some("substack"));
    assert_eq!(req.contents.text.max_characters, MAX_CONTENT_CHARACTERS);
    assert!(req.contents.highlights);
    Ok(())
}

#[tokio::test]
async fn test_backend_error_propagates() {
    let backend = Arc::new(FakeBackend::failing(429));
    let search = InterestSearch::new(backend.clone());

    let err = search.search("x", Some("videos")).await.unwrap_err();

    assert!(matches!(err, Error::Exa { status, .. } if status.as_u16() == 429));
    assert!(err.is_upstream());
    assert_eq!(backend.requests.lock().unwrap().len(), 1, "no retry");
}
