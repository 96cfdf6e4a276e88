use crate::CLAP_STYLING;
use clap::arg;
use sitegraph::handlers::{
    DEFAULT_DEPTH, DEFAULT_LINK_LIMIT, DEFAULT_OUTPUT, DEFAULT_ROOT_URL, DEFAULT_THREADS,
    DEFAULT_TIMEOUT_SECS,
};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitegraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitegraph")
        .about("Breadth-first crawl from a root URL and render the link graph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress the spinner and the crawl summary").required(false))
        .arg(
            arg!(-u --"url" <URL>)
                .required(false)
                .help("The URL the site graph is rooted at")
                .value_parser(clap::value_parser!(Url))
                .default_value(DEFAULT_ROOT_URL),
        )
        .arg(
            arg!(-d --"depth" <DEPTH>)
                .required(false)
                .help("The maximum number of layers to traverse")
                .value_parser(clap::value_parser!(usize))
                .default_value(DEFAULT_DEPTH),
        )
        .arg(
            arg!(-o --"out" <PATH>)
                .required(false)
                .help("The file the rendered graph is saved as")
                .default_value(DEFAULT_OUTPUT),
        )
        .arg(
            arg!(-l --"link-limit" <NUM>)
                .required(false)
                .visible_alias("ll")
                .help("The maximum number of children a page can have")
                .value_parser(clap::value_parser!(usize))
                .default_value(DEFAULT_LINK_LIMIT),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Output format (default: inferred from the --out extension)")
                .value_parser(["png", "svg", "pdf", "jpg", "dot", "json"]),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("Pages fetched concurrently within a layer. Graph order is unchanged.")
                .value_parser(clap::value_parser!(usize))
                .default_value(DEFAULT_THREADS),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds (at least 1)")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value(DEFAULT_TIMEOUT_SECS),
        )
        .arg(
            arg!(--"fail-fast")
                .required(false)
                .help("Abort on the first page that cannot be fetched (default: skip it)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"blacklist" <SUBSTRING>)
                .required(false)
                .help("Reject links containing SUBSTRING. Repeatable; replaces the default list.")
                .action(clap::ArgAction::Append),
        )
}
