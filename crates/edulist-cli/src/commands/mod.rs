//! Subcommand implementations.

pub mod browse;
pub mod config;
pub mod list;
pub mod show;

use anyhow::Result;
use colored::Colorize;

use edulist_core::{Blog, College, Exam, Item};
use edulist_query::{QueryCache, QueryConfig};

use crate::backend::Catalog;
use crate::config::Settings;

/// Everything a catalog command needs.
pub struct Session {
    pub catalog: Catalog,
    pub cache: QueryCache,
    pub query: QueryConfig,
}

impl Session {
    pub fn open(settings: &Settings) -> Result<Self> {
        let query = settings.query_config();
        Ok(Self {
            catalog: Catalog::open(settings)?,
            cache: QueryCache::new(&query),
            query,
        })
    }
}

/// One-line rendering of an item in a list.
pub trait Summary: Item + serde::Serialize {
    fn summary(&self) -> String;
}

impl Summary for College {
    fn summary(&self) -> String {
        let mut line = self.name.bold().to_string();
        if let Some(country) = self.country() {
            line.push_str(&format!(" ({})", country));
        }
        if let Some(rank) = self.ranking {
            line.push_str(&format!("  #{}", rank));
        }
        if !self.exams.is_empty() {
            line.push_str(&format!("  {}", self.exams.join(", ").dimmed()));
        }
        line
    }
}

impl Summary for Exam {
    fn summary(&self) -> String {
        let mut line = self.name.bold().to_string();
        if !self.short_name.is_empty() && self.short_name != self.name {
            line.push_str(&format!(" ({})", self.short_name));
        }
        let tags: Vec<&str> = [self.exam_type.as_str(), self.exam_mode.as_str()]
            .into_iter()
            .filter(|tag| !tag.is_empty())
            .collect();
        if !tags.is_empty() {
            line.push_str(&format!("  {}", tags.join(" / ").dimmed()));
        }
        line
    }
}

impl Summary for Blog {
    fn summary(&self) -> String {
        let mut line = self.title.bold().to_string();
        if !self.category.is_empty() {
            line.push_str(&format!("  [{}]", self.category));
        }
        if let Some(date) = self.date() {
            line.push_str(&format!("  {}", date.format("%d %b %Y").to_string().dimmed()));
        }
        line
    }
}
