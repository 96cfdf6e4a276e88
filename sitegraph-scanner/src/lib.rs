pub mod error;
pub mod fetch;
pub mod normalize;
pub mod page;

pub use error::ScanError;
pub use fetch::{Fetch, FetchedPage, HttpFetcher};
pub use normalize::{DEFAULT_BLACKLIST, HostContext, LinkNormalizer};
pub use page::PageScanner;
