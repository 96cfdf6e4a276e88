use crate::error::{Result, ScanError};
use crate::normalize::HostContext;
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// A fetched page, with the final URL after redirects.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested (the frontier entry).
    pub url: String,
    /// Where the request ended up after following redirects.
    pub final_url: Url,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub response_time: Duration,
    /// Empty for non-HTML responses, which are not read.
    pub body: String,
}

impl FetchedPage {
    /// Build an HTML page. Mostly useful for tests and in-memory fetchers.
    pub fn html(url: &str, final_url: Url, body: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            final_url,
            status_code: 200,
            content_type: Some("text/html".to_string()),
            response_time: Duration::from_secs(0),
            body: body.into(),
        }
    }

    pub fn is_html(&self) -> bool {
        is_html_content_type(self.content_type.as_deref())
    }

    /// Host context for resolving root-relative links found on this page.
    pub fn host(&self) -> Result<HostContext> {
        HostContext::from_url(&self.final_url).ok_or_else(|| {
            ScanError::ParseError(format!("No host in final URL {}", self.final_url))
        })
    }
}

/// Anything that can turn a URL into a page.
///
/// The crawler only depends on this trait, so tests can plug in an in-memory
/// site and the binary uses [`HttpFetcher`].
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage>> + Send;
}

/// Missing content types are given the benefit of the doubt.
fn is_html_content_type(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml+xml")
        }
    }
}

/// reqwest-backed fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(10)
    }

    /// A zero timeout would fail every request, so it is refused.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        if timeout_secs == 0 {
            return Err(ScanError::ParseError(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(concat!("Sitegraph/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        debug!("Fetching {}", url);

        let request_url =
            Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;

        let start = Instant::now();
        let response = self.client.get(request_url).send().await?;
        let response_time = start.elapsed();

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = if is_html_content_type(content_type.as_deref()) {
            response.text().await?
        } else {
            debug!("Skipping body of {} ({:?})", url, content_type);
            String::new()
        };

        if final_url.as_str() != url {
            debug!("{} resolved to {}", url, final_url);
        }

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            status_code: status.as_u16(),
            content_type,
            response_time,
            body,
        })
    }
}
