use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("invalid bind address {0:?}")]
    InvalidAddr(String),

    #[error("invalid base url {0:?}")]
    InvalidUrl(String),

    #[error("value for {0} is not a valid http header")]
    InvalidHeader(&'static str),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success answer from the document service.
    #[error("notion api returned {status} ({code}): {message}")]
    Notion {
        status: StatusCode,
        code: String,
        message: String,
    },

    /// Non-success answer from the search service.
    #[error("exa api returned {status}: {message}")]
    Exa { status: StatusCode, message: String },
}

impl Error {
    /// True for failures that came from one of the upstream services rather
    /// than from local setup.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Notion { .. } | Error::Exa { .. })
    }
}
