use std::fmt;
use tracing::trace;
use url::Url;

/// Substrings that mark an href as non-navigable for encyclopedia-style crawls:
/// fragments, additive paths, queries and the non-article namespaces.
pub const DEFAULT_BLACKLIST: &[&str] = &["#", "+", "Special:", "File:", "Wikipedia:", "?", "Help:"];

/// Scheme and host of the page currently being scanned.
///
/// Root-relative links (`/about`) are resolved against this value. It is
/// derived from the *final* URL of a fetch, after redirects, and is handed to
/// the normalizer per page rather than kept anywhere global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    origin: String,
}

impl HostContext {
    /// Wrap a raw `scheme://host[:port]` string. A trailing `/` is tolerated.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    /// Build the context from a resolved URL. Returns `None` for URLs without
    /// a tuple origin (`data:`, `file:`, ...).
    pub fn from_url(url: &Url) -> Option<Self> {
        let origin = url.origin();
        if !origin.is_tuple() {
            return None;
        }
        Some(Self::new(origin.ascii_serialization()))
    }

    pub fn as_str(&self) -> &str {
        &self.origin
    }

    /// Append a root-relative path (given without its leading `/`).
    fn join_root(&self, rest: &str) -> String {
        if self.origin.ends_with('/') {
            format!("{}{}", self.origin, rest)
        } else {
            format!("{}/{}", self.origin, rest)
        }
    }
}

impl fmt::Display for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}

/// Classifies raw `href` values and rewrites the accepted ones into canonical
/// absolute URLs.
///
/// The normalizer never consults the visited set. Deduplication is the
/// caller's single insert-if-absent on the graph, so a URL that appears twice
/// on one page is normalized twice but accepted once.
#[derive(Debug, Clone)]
pub struct LinkNormalizer {
    blacklist: Vec<String>,
}

impl LinkNormalizer {
    pub fn new() -> Self {
        Self::with_blacklist(DEFAULT_BLACKLIST.iter().map(|s| s.to_string()))
    }

    pub fn with_blacklist<I, S>(blacklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blacklist: blacklist
                .into_iter()
                .map(Into::<String>::into)
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    pub fn is_blacklisted(&self, candidate: &str) -> bool {
        self.blacklist.iter().any(|b| candidate.contains(b.as_str()))
    }

    /// Resolve `raw` into a canonical absolute URL, or reject it.
    ///
    /// * `/path` resolves against `host`.
    /// * `./path` resolves against `base` (the page URL that was queued).
    /// * `http://` and `https://` links are taken as they are.
    ///
    /// Everything else (protocol-relative, `mailto:`, `javascript:`, bare
    /// relative paths, anchors) is rejected.
    pub fn normalize(&self, raw: &str, base: &str, host: &HostContext) -> Option<String> {
        let raw = raw.trim();
        if self.is_blacklisted(raw) {
            trace!("Rejected {} (blacklisted)", raw);
            return None;
        }

        let candidate = if raw.starts_with("//") {
            return None;
        } else if let Some(rest) = raw.strip_prefix('/') {
            host.join_root(rest)
        } else if raw.starts_with("./") {
            Url::parse(base).ok()?.join(raw).ok()?.to_string()
        } else if has_http_scheme(raw) {
            raw.to_string()
        } else {
            trace!("Rejected {} (unsupported form)", raw);
            return None;
        };

        let canonical = Url::parse(&candidate).ok()?;
        if !matches!(canonical.scheme(), "http" | "https") || canonical.host_str().is_none() {
            return None;
        }

        let canonical = String::from(canonical);
        // canonicalization may percent-encode, so check the final form too
        if self.is_blacklisted(&canonical) {
            return None;
        }
        Some(canonical)
    }
}

impl Default for LinkNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn has_http_scheme(raw: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        raw.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
