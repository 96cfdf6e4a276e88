use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_core::{
    CrawlOptions, CrawlReport, Crawler, ErrorPolicy, GraphRenderer, OutputFormat,
};
use sitegraph_scanner::HttpFetcher;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

pub const DEFAULT_ROOT_URL: &str = "https://en.wikipedia.org/wiki/Shor%27s_algorithm";
pub const DEFAULT_DEPTH: &str = "3";
pub const DEFAULT_OUTPUT: &str = "output.png";
pub const DEFAULT_LINK_LIMIT: &str = "3";
pub const DEFAULT_THREADS: &str = "1";
pub const DEFAULT_TIMEOUT_SECS: &str = "10";

/// Everything the `sitegraph` command line asks for
#[derive(Debug, Clone)]
pub struct CrawlArgs {
    pub url: String,
    pub depth: usize,
    pub out: String,
    pub link_limit: usize,
    pub format: Option<String>,
    pub threads: usize,
    pub timeout_secs: u64,
    pub fail_fast: bool,
    pub blacklist: Option<Vec<String>>,
    pub quiet: bool,
}

impl Default for CrawlArgs {
    fn default() -> Self {
        Self {
            url: DEFAULT_ROOT_URL.to_string(),
            depth: 3,
            out: DEFAULT_OUTPUT.to_string(),
            link_limit: 3,
            format: None,
            threads: 1,
            timeout_secs: 10,
            fail_fast: false,
            blacklist: None,
            quiet: false,
        }
    }
}

impl CrawlArgs {
    pub fn crawl_options(&self) -> CrawlOptions {
        let policy = if self.fail_fast {
            ErrorPolicy::FailFast
        } else {
            ErrorPolicy::BestEffort
        };

        let mut options = CrawlOptions::default()
            .with_max_depth(self.depth)
            .with_link_limit(self.link_limit)
            .with_workers(self.threads.max(1))
            .with_error_policy(policy);
        if let Some(blacklist) = &self.blacklist {
            options = options.with_blacklist(blacklist.clone());
        }
        options
    }
}

/// Expand `~` in the output path and work out which format to write.
///
/// An explicit format wins; otherwise the extension decides.
pub fn resolve_output(out: &str, format: Option<&str>) -> Result<(PathBuf, OutputFormat), String> {
    let expanded = shellexpand::tilde(out);
    let path = PathBuf::from(expanded.as_ref());

    let format = OutputFormat::resolve(&path, format).map_err(|e| e.to_string())?;
    Ok((path, format))
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Generate a plain-text crawl summary
pub fn generate_crawl_summary(report: &CrawlReport, output: &Path) -> String {
    let mut summary = String::new();
    summary.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    summary.push_str("# Summary:\n");
    summary.push_str(&format!("  Root: {}\n", report.root));
    summary.push_str(&format!("  Layers: {}\n", report.layers));
    summary.push_str(&format!("  Pages fetched: {}\n", report.pages_fetched));
    summary.push_str(&format!("  Nodes: {}\n", report.graph.node_count()));
    summary.push_str(&format!("  Edges: {}\n", report.graph.edge_count()));
    summary.push_str(&format!("  Output: {}\n", output.display()));

    // Nodes per layer
    let mut by_depth: BTreeMap<usize, usize> = BTreeMap::new();
    for node in report.graph.nodes() {
        *by_depth.entry(node.depth).or_default() += 1;
    }
    summary.push_str("\n## Layers\n");
    for (depth, count) in &by_depth {
        summary.push_str(&format!("  depth {}: {} node(s)\n", depth, count));
    }

    if !report.failures.is_empty() {
        summary.push_str(&format!("\n## Failures ({})\n", report.failures.len()));
        for failure in &report.failures {
            summary.push_str(&format!(
                "  [depth {}] {}: {}\n",
                failure.depth, failure.url, failure.error
            ));
        }
    }

    summary
}

fn crawl_spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Starting crawl...");
    Ok(pb)
}

/// Crawl, render and report
pub async fn handle_crawl(args: CrawlArgs) -> Result<()> {
    let (output, format) = resolve_output(&args.out, args.format.as_deref())
        .map_err(anyhow::Error::msg)?;

    let fetcher =
        HttpFetcher::with_timeout(args.timeout_secs).context("Failed to create HTTP client")?;
    let mut crawler = Crawler::new(fetcher, args.crawl_options());

    let spinner = if args.quiet {
        None
    } else {
        println!("\nCrawling {}", args.url.bright_white());
        println!(
            "Depth: {}  Link limit: {}  Workers: {}\n",
            args.depth, args.link_limit, args.threads
        );
        Some(crawl_spinner()?)
    };

    if let Some(pb) = &spinner {
        let pb = pb.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |depth: usize, url: String| {
            pb.set_message(format!("[depth {}] {}", depth, extract_url_path(&url)));
        }));
    }

    let report = crawler.crawl(&args.url).await;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let report = report.with_context(|| format!("Crawl of {} failed", args.url))?;

    GraphRenderer::new()
        .render_to_file(&report.graph, &output, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {}", output.display());

    println!("{}", "Completed!".green().bold());
    if !args.quiet {
        print!("{}", generate_crawl_summary(&report, &output));
        if !report.failures.is_empty() {
            println!(
                "{} {} page(s) could not be fetched and were treated as leaves",
                "⚠".yellow().bold(),
                report.failures.len()
            );
        }
    }

    Ok(())
}
