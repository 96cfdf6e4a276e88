use crate::error::{CrawlError, Result};
use crate::frontier::Frontier;
use crate::graph::LinkGraph;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use sitegraph_scanner::{DEFAULT_BLACKLIST, Fetch, FetchedPage, LinkNormalizer, PageScanner, ScanError};
use std::pin::pin;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// What to do when a page cannot be fetched or understood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log it, record it in the report and treat the page as childless
    #[default]
    BestEffort,
    /// Abort the crawl with the error
    FailFast,
}

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub max_depth: usize,
    pub link_limit: usize,
    /// Concurrent fetches per layer. 1 means fully sequential.
    pub workers: usize,
    pub error_policy: ErrorPolicy,
    pub blacklist: Vec<String>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            link_limit: 3,
            workers: 1,
            error_policy: ErrorPolicy::BestEffort,
            blacklist: DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CrawlOptions {
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_link_limit(mut self, limit: usize) -> Self {
        self.link_limit = limit;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_blacklist(mut self, blacklist: Vec<String>) -> Self {
        self.blacklist = blacklist;
        self
    }
}

/// Callback for reporting crawl progress as `(depth, url)`
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// A page that produced no links because something went wrong.
#[derive(Debug, Clone, Serialize)]
pub struct FetchFailure {
    pub url: String,
    pub depth: usize,
    pub error: String,
}

/// Everything a finished crawl produced.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub root: String,
    pub graph: LinkGraph,
    pub pages_fetched: usize,
    pub layers: usize,
    pub failures: Vec<FetchFailure>,
}

/// Level-synchronous breadth-first crawler.
///
/// Each layer is fetched completely before the next one starts. Links are
/// committed to the graph in frontier order, so the resulting graph is the
/// same whether pages were fetched one at a time or by a pool of workers.
pub struct Crawler<F> {
    fetcher: F,
    scanner: PageScanner,
    options: CrawlOptions,
    progress_callback: Option<ProgressCallback>,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(fetcher: F, options: CrawlOptions) -> Self {
        let scanner = PageScanner::new(LinkNormalizer::with_blacklist(options.blacklist.clone()));
        Self {
            fetcher,
            scanner,
            options,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn crawl(&self, root: &str) -> Result<CrawlReport> {
        let root = canonical_root(root)?;
        let CrawlOptions {
            max_depth,
            link_limit,
            workers,
            ..
        } = self.options;

        info!(
            "Starting crawl of {} (depth {}, link limit {}, {} worker(s))",
            root, max_depth, link_limit, workers
        );

        let mut graph = LinkGraph::new();
        graph.add_node(&root, 0);

        let mut current = Frontier::new();
        let mut next = Frontier::new();
        current.enqueue(root.clone());

        let mut pages_fetched = 0;
        let mut failures = Vec::new();

        for depth in 0..max_depth {
            info!("Layer {}: {} page(s) to fetch", depth, current.len());

            {
                let fetched = stream::iter(current.drain())
                    .map(move |url| async move {
                        if let Some(callback) = &self.progress_callback {
                            callback(depth, url.clone());
                        }
                        let result = self.fetcher.fetch(&url).await;
                        (url, result)
                    })
                    .buffered(workers.max(1));
                let mut fetched = pin!(fetched);

                while let Some((url, result)) = fetched.next().await {
                    let outcome =
                        result.and_then(|page| self.expand_page(&url, &page, depth, &mut graph));
                    match outcome {
                        Ok(links) => {
                            pages_fetched += 1;
                            for link in links {
                                next.enqueue(link);
                            }
                        }
                        Err(source) => match self.options.error_policy {
                            ErrorPolicy::FailFast => {
                                return Err(CrawlError::Fetch { url, source });
                            }
                            ErrorPolicy::BestEffort => {
                                warn!("Crawl error for {}: {}", url, source);
                                failures.push(FetchFailure {
                                    url,
                                    depth,
                                    error: source.to_string(),
                                });
                            }
                        },
                    }
                }
            }

            std::mem::swap(&mut current, &mut next);
            next.clear();
        }

        info!(
            "Crawl complete. {} node(s), {} edge(s), {} page(s) fetched, {} failure(s)",
            graph.node_count(),
            graph.edge_count(),
            pages_fetched,
            failures.len()
        );

        Ok(CrawlReport {
            root,
            graph,
            pages_fetched,
            layers: max_depth,
            failures,
        })
    }

    /// Scan one fetched page and commit its new links to the graph.
    ///
    /// Edges start at `url`, the frontier entry that already has a node,
    /// whatever form the fetcher reports for the page.
    fn expand_page(
        &self,
        url: &str,
        page: &FetchedPage,
        depth: usize,
        graph: &mut LinkGraph,
    ) -> std::result::Result<Vec<String>, ScanError> {
        if !page.is_html() {
            debug!("{} is not HTML ({:?}), no links", url, page.content_type);
            return Ok(Vec::new());
        }

        let host = page.host()?;
        let links = self.scanner.scan(
            &page.body,
            url,
            &host,
            self.options.link_limit,
            |link| graph.add_node(link, depth + 1).is_some(),
        );

        for link in &links {
            graph.add_edge(url, link);
        }
        debug!("{} -> {} new link(s)", url, links.len());

        Ok(links)
    }
}

/// Parse and canonicalize the root URL so it uses the same key form as
/// every discovered link.
pub fn canonical_root(root: &str) -> Result<String> {
    let url = Url::parse(root.trim()).map_err(|e| CrawlError::InvalidRoot {
        url: root.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CrawlError::InvalidRoot {
            url: root.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url.into())
}
