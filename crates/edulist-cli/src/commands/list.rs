//! List commands for colleges, exams and blogs.

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;

use tracing::debug;

use edulist_core::{FilterState, ItemSource};
use edulist_query::{ListController, ListView, QueryCache};

use super::{Session, Summary};
use crate::cli::ListOptions;
use crate::output;

#[derive(Args, Debug)]
pub struct CollegesArgs {
    /// Only colleges in this country
    #[arg(long)]
    pub country: Option<String>,

    /// Only colleges accepting this exam
    #[arg(long)]
    pub exam: Option<String>,

    #[command(flatten)]
    pub options: ListOptions,
}

#[derive(Args, Debug)]
pub struct ExamsArgs {
    /// Only exams of this type (e.g. Engineering)
    #[arg(long = "type")]
    pub exam_type: Option<String>,

    /// Only exams held in this mode (e.g. Online)
    #[arg(long)]
    pub mode: Option<String>,

    #[command(flatten)]
    pub options: ListOptions,
}

#[derive(Args, Debug)]
pub struct BlogsArgs {
    /// Only articles in this category
    #[arg(long)]
    pub category: Option<String>,

    #[command(flatten)]
    pub options: ListOptions,
}

pub async fn colleges(args: CollegesArgs, session: &Session) -> Result<()> {
    let filter = filter(&args.options, args.country, args.exam);
    run(session.catalog.colleges(), &session.cache, filter, &args.options).await
}

pub async fn exams(args: ExamsArgs, session: &Session) -> Result<()> {
    let filter = filter(&args.options, args.exam_type, args.mode);
    run(session.catalog.exams(), &session.cache, filter, &args.options).await
}

pub async fn blogs(args: BlogsArgs, session: &Session) -> Result<()> {
    let filter = filter(&args.options, args.category, None);
    run(session.catalog.blogs(), &session.cache, filter, &args.options).await
}

fn filter(options: &ListOptions, category: Option<String>, secondary: Option<String>) -> FilterState {
    FilterState::new()
        .with_search(options.search.clone().unwrap_or_default())
        .with_category(category)
        .with_secondary(secondary)
}

/// Load up to `options.pages` pages, scrolling through the sentinel each time.
async fn run<T: Summary>(
    source: Arc<dyn ItemSource<Item = T>>,
    cache: &QueryCache,
    filter: FilterState,
    options: &ListOptions,
) -> Result<()> {
    let resource = source.resource();
    let mut list = ListController::new(source, cache.clone());

    let request = list.set_filter(filter).or_else(|| list.start());
    list.complete(request).await;

    for _ in 1..options.pages.max(1) {
        let Some(sentinel) = list.observe_sentinel() else {
            break;
        };
        let Some(request) = list.on_sentinel_visible(&sentinel) else {
            break;
        };
        debug!(page = request.page(), "scrolling");
        list.complete(Some(request)).await;
    }

    match list.view() {
        ListView::Error { message, items, .. } => {
            print_items(items, options.json)?;
            bail!("{}", message);
        }
        ListView::Empty | ListView::Idle | ListView::Loading => {
            output::no_results();
            return Ok(());
        }
        ListView::Ready {
            items, has_more, ..
        } => {
            print_items(items, options.json)?;

            let shown = items.len();
            let total = list.total_count().max(shown as u64);
            output::status(&format!("Showing {} of {} {}", shown, total, resource));
            if has_more {
                output::status("More results available (use --pages to load more)");
            }
        }
    }

    if options.facets {
        output::facets(
            resource.category_facet(),
            resource.secondary_facet(),
            &list.facets(),
        );
    }

    Ok(())
}

fn print_items<T: Summary>(items: &[T], json: bool) -> Result<()> {
    for item in items {
        if json {
            output::json(item)?;
        } else {
            println!("{}", item.summary());
        }
    }
    Ok(())
}
