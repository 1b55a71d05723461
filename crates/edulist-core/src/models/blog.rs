use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Item;
use crate::types::Resource;

/// A blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub comments: Option<u64>,
    #[serde(default)]
    pub related_exams: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Blog {
    /// Publication date, falling back to the creation time.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.created_at)
    }
}

impl Item for Blog {
    const RESOURCE: Resource = Resource::Blogs;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn category_values(&self) -> Vec<&str> {
        vec![self.category.as_str()]
    }

    fn secondary_values(&self) -> Vec<&str> {
        Vec::new()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.content.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}
