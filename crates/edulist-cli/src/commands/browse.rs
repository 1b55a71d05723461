//! Interactive browsing with debounced search.
//!
//! Each plain line read from stdin is treated as the current contents of a
//! search box: it is debounced, and only text that survives the quiet period
//! becomes a request. Lines starting with `:` are commands.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use futures_util::future::LocalBoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tokio::sync::mpsc;

use tracing::debug;

use edulist_core::{FacetSelection, ItemSource, Resource};
use edulist_query::{Applied, Debouncer, ListController, ListView, PageOutcome, PageRequest};

use super::{Session, Summary};
use crate::output;

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// What to browse: colleges, exams or blogs
    #[arg(default_value = "colleges")]
    pub resource: Resource,
}

const HELP: &str = "\
Type text to search. Commands:
  :more              load the next page
  :<facet> <value>   filter by a facet (`all` clears it)
  :facets            show the available filter values
  :retry             retry the failed request
  :refresh           reload the list, skipping the cache
  :quit              exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Search(String),
    More,
    Facet { name: String, selection: FacetSelection },
    Facets,
    Retry,
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.strip_prefix(':') else {
            return Input::Search(line.to_string());
        };

        let (name, arg) = match command.trim().split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg)),
            None => (command.trim(), None),
        };

        match (name.to_ascii_lowercase().as_str(), arg) {
            ("more" | "m", None) => Input::More,
            ("facets", None) => Input::Facets,
            ("retry", None) => Input::Retry,
            ("refresh", None) => Input::Refresh,
            ("help" | "h", None) => Input::Help,
            ("quit" | "q" | "exit", None) => Input::Quit,
            (facet, Some(value)) if !facet.is_empty() => Input::Facet {
                name: facet.to_string(),
                selection: FacetSelection::parse(value),
            },
            _ => Input::Unknown(line.to_string()),
        }
    }
}

type InFlight<T> = FuturesUnordered<LocalBoxFuture<'static, PageOutcome<T>>>;

pub async fn run(args: BrowseArgs, session: &Session) -> Result<()> {
    match args.resource {
        Resource::Colleges => browse(session.catalog.colleges(), session).await,
        Resource::Exams => browse(session.catalog.exams(), session).await,
        Resource::Blogs => browse(session.catalog.blogs(), session).await,
    }
}

async fn browse<T: Summary>(source: Arc<dyn ItemSource<Item = T>>, session: &Session) -> Result<()> {
    let resource = source.resource();
    let mut list = ListController::new(source, session.cache.clone());
    let (mut debouncer, mut committed) = Debouncer::new(session.query.debounce);
    let mut in_flight: InFlight<T> = FuturesUnordered::new();
    let mut lines = read_lines();
    let mut stdin_open = true;

    output::status(&format!(
        "Browsing {} at {}. Type to search, :help for commands.",
        resource,
        session.catalog.url()
    ));
    let first = list.start();
    render(&list);
    submit(&mut in_flight, first);

    loop {
        if !stdin_open && !debouncer.is_pending() && committed.is_empty() && in_flight.is_empty() {
            break;
        }

        tokio::select! {
            line = lines.recv(), if stdin_open => {
                let Some(line) = line.transpose()? else {
                    debug!("stdin closed");
                    stdin_open = false;
                    continue;
                };
                match Input::parse(&line) {
                    Input::Search(text) => debouncer.push(text),
                    Input::Quit => break,
                    input => {
                        let request = handle(&mut list, resource, input);
                        submit(&mut in_flight, request);
                    }
                }
            }
            Some(text) = committed.recv() => {
                debug!(search = %text, "search committed");
                let request = list.set_search(text);
                render(&list);
                submit(&mut in_flight, request);
            }
            Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                match list.apply(outcome) {
                    Applied::Stale => debug!("dropped response for a superseded request"),
                    Applied::Committed | Applied::Failed => render(&list),
                }
            }
            else => break,
        }
    }

    Ok(())
}

/// Read stdin on a plain thread so a pending read never holds up shutdown.
fn read_lines() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (sender, receiver) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn submit<T: Summary>(in_flight: &mut InFlight<T>, request: Option<PageRequest<T>>) {
    if let Some(request) = request {
        debug!(key = %request.fetch_key(), "submitting request");
        in_flight.push(request.run().boxed_local());
    }
}

fn handle<T: Summary>(
    list: &mut ListController<T>,
    resource: Resource,
    input: Input,
) -> Option<PageRequest<T>> {
    match input {
        Input::More => {
            let request = list
                .observe_sentinel()
                .and_then(|sentinel| list.on_sentinel_visible(&sentinel));
            match &request {
                Some(request) => output::status(&format!("Loading page {}...", request.page())),
                None if list.status().is_fetching() => output::status("Already loading"),
                None if list.error().is_some() => output::status("Type :retry to try again"),
                None => output::status("No more results"),
            }
            request
        }
        Input::Facet { name, selection } => {
            let request = if name == resource.category_facet() {
                list.set_category(selection)
            } else if Some(name.as_str()) == resource.secondary_facet() {
                list.set_secondary(selection)
            } else {
                output::error(&format!("{} cannot be filtered by {}", resource, name));
                return None;
            };
            render(list);
            request
        }
        Input::Facets => {
            output::facets(
                resource.category_facet(),
                resource.secondary_facet(),
                &list.facets(),
            );
            None
        }
        Input::Retry => {
            let request = list.retry();
            if request.is_none() {
                output::status("Nothing to retry");
            }
            request
        }
        Input::Refresh => {
            let request = list.refresh();
            render(list);
            request
        }
        Input::Help => {
            println!("{}", HELP);
            None
        }
        Input::Unknown(line) => {
            output::error(&format!("Unknown command: {}", line));
            None
        }
        Input::Search(_) | Input::Quit => None,
    }
}

fn render<T: Summary>(list: &ListController<T>) {
    match list.view() {
        ListView::Idle => {}
        ListView::Loading => output::status("Loading..."),
        ListView::Error {
            message, retryable, ..
        } => {
            output::error(&message);
            if retryable {
                output::status("Type :retry to try again");
            }
        }
        ListView::Empty => output::no_results(),
        ListView::Ready {
            items,
            loading_more,
            has_more,
        } => {
            println!();
            for item in items {
                println!("{}", item.summary());
            }
            let total = list.total_count().max(items.len() as u64);
            output::status(&format!(
                "Showing {} of {} {}",
                items.len(),
                total,
                list.resource()
            ));
            if loading_more {
                output::status("Loading more...");
            } else if has_more {
                output::status("Type :more to load more");
            }
        }
    }
}
