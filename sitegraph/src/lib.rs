// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CrawlArgs, extract_url_path, generate_crawl_summary, handle_crawl, resolve_output,
};

// Re-export crawl functionality from sitegraph-core
pub use sitegraph_core::{CrawlOptions, CrawlReport, Crawler, ErrorPolicy, OutputFormat};
