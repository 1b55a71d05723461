//! edulist - CLI for browsing the college, exam and blog catalog.
//!
//! A thin wrapper over `edulist-query`: list commands load pages the way a
//! scrolling view would, and `browse` drives a list interactively with
//! debounced search read from stdin.

mod backend;
mod cli;
mod commands;
mod config;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{Session, browse, list, show};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let base_url = cli.base_url.as_deref();
    let session = || -> Result<Session> {
        let settings = config::load()?.resolve(base_url)?;
        Session::open(&settings)
    };

    match cli.command {
        Commands::Colleges(args) => list::colleges(args, &session()?).await,
        Commands::Exams(args) => list::exams(args, &session()?).await,
        Commands::Blogs(args) => list::blogs(args, &session()?).await,
        Commands::Blog(args) => show::run(args, &session()?).await,
        Commands::Browse(args) => browse::run(args, &session()?).await,
        Commands::Config(cmd) => commands::config::handle(cmd, base_url),
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
