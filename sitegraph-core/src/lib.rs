pub mod crawl;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod render;

pub use crawl::{CrawlOptions, CrawlReport, Crawler, ErrorPolicy, FetchFailure, ProgressCallback};
pub use error::CrawlError;
pub use frontier::Frontier;
pub use graph::{LinkGraph, PageNode};
pub use render::{GraphRenderer, OutputFormat};
