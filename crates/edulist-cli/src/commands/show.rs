//! Show a single blog article.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use edulist_query::find_by_slug;

use super::Session;
use crate::output;

#[derive(Args, Debug)]
pub struct BlogArgs {
    /// Article slug, as in /blogs/<slug>
    pub slug: String,

    /// Print the article as pretty JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: BlogArgs, session: &Session) -> Result<()> {
    let blog = match find_by_slug(&session.cache, session.catalog.blogs(), &args.slug).await {
        Ok(blog) => blog,
        Err(err) => bail!("{}", err.user_message()),
    };

    if args.json {
        return output::json_pretty(&blog);
    }

    println!("{}", blog.title.bold());
    println!();
    if !blog.category.is_empty() {
        output::field("Category", &blog.category);
    }
    if let Some(author) = &blog.author {
        output::field("Author", author);
    }
    if let Some(date) = blog.date() {
        output::field("Published", &date.format("%d %B %Y").to_string());
    }
    if let Some(minutes) = blog.read_time {
        output::field("Read time", &format!("{} min", minutes));
    }
    if !blog.tags.is_empty() {
        output::field("Tags", &blog.tags.join(", "));
    }
    if !blog.related_exams.is_empty() {
        output::field("Related exams", &blog.related_exams.join(", "));
    }
    if !blog.content.is_empty() {
        println!();
        println!("{}", blog.content);
    }

    Ok(())
}
