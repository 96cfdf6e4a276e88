use crate::normalize::{HostContext, LinkNormalizer};
use scraper::{ElementRef, Html};
use tracing::debug;

/// Extracts outbound links from an HTML page, in document order, up to a
/// per-page limit.
#[derive(Debug, Clone, Default)]
pub struct PageScanner {
    normalizer: LinkNormalizer,
}

impl PageScanner {
    pub fn new(normalizer: LinkNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &LinkNormalizer {
        &self.normalizer
    }

    /// Scan `html` for anchors and return at most `limit` accepted links.
    ///
    /// Every normalized href is offered to `accept`; only links for which it
    /// returns `true` are collected. The crawler passes the graph's
    /// insert-if-absent here, so acceptance and dedup happen in one step.
    /// Scanning stops as soon as `limit` links have been accepted.
    ///
    /// Broken markup is never an error: the parser recovers what it can and
    /// whatever anchors it recovered are scanned.
    pub fn scan<A>(
        &self,
        html: &str,
        base: &str,
        host: &HostContext,
        limit: usize,
        mut accept: A,
    ) -> Vec<String>
    where
        A: FnMut(&str) -> bool,
    {
        let mut links = Vec::new();
        if limit == 0 {
            return links;
        }

        let document = Html::parse_document(html);
        let anchors = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name().eq_ignore_ascii_case("a"));

        for anchor in anchors {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Some(link) = self.normalizer.normalize(href, base, host) else {
                continue;
            };
            if accept(&link) {
                debug!("Accepted link: {} (from {})", link, base);
                links.push(link);
                if links.len() >= limit {
                    break;
                }
            }
        }

        links
    }
}
