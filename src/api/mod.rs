use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::fetcher::ContentFetcher;
use crate::graph::GraphStyle;
use crate::interest_search::InterestSearch;

pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<ContentFetcher>,
    pub search: Arc<InterestSearch>,
    pub graph_style: GraphStyle,
}

impl AppState {
    pub fn new(fetcher: ContentFetcher, search: InterestSearch) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            search: Arc::new(search),
            graph_style: GraphStyle::default(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Interactive page
        .route("/", get(handlers::app_handler))
        // API routes
        .route("/api/pages/:page_id", get(handlers::page_handler))
        .route("/api/search", post(handlers::search_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
