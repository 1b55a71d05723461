//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::browse::BrowseArgs;
use crate::commands::config::ConfigCommand;
use crate::commands::list::{BlogsArgs, CollegesArgs, ExamsArgs};
use crate::commands::show::BlogArgs;

/// Browse the college, exam and blog catalog.
#[derive(Parser, Debug)]
#[command(name = "edulist")]
#[command(author, version = env!("EDULIST_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Catalog API base URL, or a file:// directory of JSON fixtures
    #[arg(long, global = true, env = "EDULIST_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List colleges (paged, filtered by the server)
    Colleges(CollegesArgs),

    /// List exams
    Exams(ExamsArgs),

    /// List blog articles
    Blogs(BlogsArgs),

    /// Show one blog article
    Blog(BlogArgs),

    /// Interactive list with debounced search read from stdin
    Browse(BrowseArgs),

    /// Show or change persisted settings
    Config(ConfigCommand),
}

/// Options shared by the list commands.
#[derive(Args, Debug, Clone)]
pub struct ListOptions {
    /// Free-text search
    #[arg(long, short)]
    pub search: Option<String>,

    /// Number of pages to load, as if scrolling to the end N-1 times
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Output items as JSON, one per line
    #[arg(long)]
    pub json: bool,

    /// Also print the available filter values
    #[arg(long)]
    pub facets: bool,
}
