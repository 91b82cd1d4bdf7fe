use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use std::time::Instant;
use tracing::warn;

use crate::data_models::SearchResult;
use crate::error::Error;
use crate::graph::build_graph;
use crate::ui::{EMPTY_QUERY_WARNING, PageView, render_page};

use super::AppState;
use super::models::{AppQuery, PageContentResponse, SearchRequest, SearchResponse};

fn upstream_error(e: Error) -> (StatusCode, String) {
    warn!("upstream call failed: {:#}", e);
    let status = if e.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, e.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Search plus the optional graph. The graph is only built for two or more results.
async fn search_with_graph(
    state: &AppState,
    query: &str,
    category: Option<&str>,
    graph: bool,
) -> Result<(Vec<SearchResult>, Option<String>), Error> {
    let results = state.search.search(query, category).await?;
    let graph_html = if graph {
        build_graph(&results).map(|g| g.to_html(&state.graph_style))
    } else {
        None
    };
    Ok((results, graph_html))
}

pub async fn app_handler(
    State(state): State<AppState>,
    Query(params): Query<AppQuery>,
) -> Html<String> {
    let page_id = non_empty(params.page_id);
    let category = non_empty(params.category);
    let mut view = PageView {
        page_id: page_id.clone().unwrap_or_default(),
        query: params.query.clone().unwrap_or_default(),
        category: category.clone(),
        graph_enabled: params.graph.unwrap_or(false),
        ..Default::default()
    };

    let Some(page_id) = page_id else {
        return Html(render_page(&view));
    };

    match state.fetcher.fetch_page_text(&page_id).await {
        Ok(content) => view.content = Some(content),
        Err(e) => {
            warn!(page_id = %page_id, "page fetch failed: {:#}", e);
            view.errors.push(format!("Failed to load page: {e}"));
            return Html(render_page(&view));
        }
    }

    if params.search.unwrap_or(false) {
        match non_empty(params.query) {
            None => view.warnings.push(EMPTY_QUERY_WARNING.to_string()),
            Some(query) => {
                match search_with_graph(&state, &query, category.as_deref(), view.graph_enabled)
                    .await
                {
                    Ok((results, graph_html)) => {
                        view.results = Some(results);
                        view.graph_html = graph_html;
                    }
                    Err(e) => {
                        warn!(query = %query, "search failed: {:#}", e);
                        view.errors.push(format!("Search failed: {e}"));
                    }
                }
            }
        }
    }

    Html(render_page(&view))
}

pub async fn page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<Json<PageContentResponse>, (StatusCode, String)> {
    if page_id.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Page ID cannot be empty".to_string()));
    }

    let content = state
        .fetcher
        .fetch_page_text(&page_id)
        .await
        .map_err(upstream_error)?;

    Ok(Json(PageContentResponse { page_id, content }))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = Instant::now();

    let Some(query) = non_empty(Some(request.query)) else {
        return Err((StatusCode::BAD_REQUEST, "Query cannot be empty".to_string()));
    };

    let category = non_empty(request.category);
    let (results, graph_html) =
        search_with_graph(&state, &query, category.as_deref(), request.graph)
            .await
            .map_err(upstream_error)?;

    let total_results = results.len();
    let processing_time_ms = start.elapsed().as_millis();

    Ok(Json(SearchResponse {
        query,
        category,
        results,
        total_results,
        processing_time_ms,
        graph_html,
    }))
}

pub async fn health_handler() -> &'static str {
    "ok"
}
