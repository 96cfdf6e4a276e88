use sitegraph_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid root URL '{url}': {reason}")]
    InvalidRoot { url: String, reason: String },

    #[error("Tried to dequeue an empty frontier")]
    EmptyQueue,

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ScanError,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
