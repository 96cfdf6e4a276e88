use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use sitegraph::handlers::{CrawlArgs, handle_crawl};
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();

    // Initialize tracing for logging, quiet unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = handle_crawl(crawl_args(&matches)).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn crawl_args(matches: &ArgMatches) -> CrawlArgs {
    let defaults = CrawlArgs::default();

    CrawlArgs {
        url: matches
            .get_one::<Url>("url")
            .map(|u| u.to_string())
            .unwrap_or(defaults.url),
        depth: matches.get_one::<usize>("depth").copied().unwrap_or(defaults.depth),
        out: matches
            .get_one::<String>("out")
            .cloned()
            .unwrap_or(defaults.out),
        link_limit: matches
            .get_one::<usize>("link-limit")
            .copied()
            .unwrap_or(defaults.link_limit),
        format: matches.get_one::<String>("format").cloned(),
        threads: matches
            .get_one::<usize>("threads")
            .copied()
            .unwrap_or(defaults.threads),
        timeout_secs: matches
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(defaults.timeout_secs),
        fail_fast: matches.get_flag("fail-fast"),
        blacklist: matches
            .get_many::<String>("blacklist")
            .map(|values| values.cloned().collect()),
        quiet: matches.get_flag("quiet"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
