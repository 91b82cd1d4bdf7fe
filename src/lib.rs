pub mod api;
pub mod config;
pub mod data_models;
pub mod error;
pub mod exa;
pub mod fetcher;
pub mod graph;
pub mod interest_search;
pub mod notion;
pub mod ui;

pub use error::{Error, Result};
