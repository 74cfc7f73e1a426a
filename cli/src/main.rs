//! CLI entry point for webfetch.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};
use webfetch_core::{Session, SessionConfig};

mod cli;
mod render;

use cli::Args;

fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!(failed, total = args.urls.len(), "some URLs could not be fetched");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Fetch every URL with one shared session. Returns how many failed.
fn run(args: &Args) -> Result<usize> {
    let mut config = SessionConfig {
        max_redirects: usize::from(args.max_redirects),
        read_timeout: (args.read_timeout > 0).then(|| Duration::from_secs(args.read_timeout)),
        ..SessionConfig::default()
    };
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = user_agent.clone();
    }

    let mut session = Session::new(config);
    let mut stdout = io::stdout().lock();
    let mut failed = 0;

    for url in &args.urls {
        match session.fetch(url) {
            Ok(page) => {
                let text = if page.view_source {
                    page.body
                } else {
                    render::strip_tags(&page.body)
                };
                stdout.write_all(text.as_bytes())?;
                if !text.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
            }
            Err(e) => {
                error!(%url, "{e}");
                failed += 1;
            }
        }
    }
    stdout.flush()?;
    Ok(failed)
}
