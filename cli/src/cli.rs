//! CLI argument definitions using clap derive macros.

use clap::Parser;

use webfetch_core::MAX_REDIRECTS;

/// Fetch web documents and print their text.
///
/// Accepts http, https, file, data:text/html and view-source URLs. Markup is
/// stripped from every body except view-source ones, which print raw.
#[derive(Parser, Debug)]
#[command(name = "webfetch")]
#[command(author, version, about)]
pub struct Args {
    /// URLs to fetch, in order
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// User-Agent header sent with network requests
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Maximum redirect hops per URL (1-1024)
    #[arg(long, default_value_t = MAX_REDIRECTS as u16, value_parser = clap::value_parser!(u16).range(1..=1024))]
    pub max_redirects: u16,

    /// Socket read timeout in seconds (0 waits forever)
    #[arg(long, default_value_t = 0)]
    pub read_timeout: u64,
}
