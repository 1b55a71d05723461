use serde::{Deserialize, Serialize};

use super::Item;
use crate::types::Resource;

/// An entrance exam listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub exam_type: String,
    #[serde(default)]
    pub conducting_body: String,
    #[serde(default)]
    pub exam_mode: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hero_section: Option<HeroSection>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSection {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_active() -> bool {
    true
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

impl Item for Exam {
    const RESOURCE: Resource = Resource::Exams;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn category_values(&self) -> Vec<&str> {
        non_empty(&self.exam_type).into_iter().collect()
    }

    fn secondary_values(&self) -> Vec<&str> {
        non_empty(&self.exam_mode).into_iter().collect()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.short_name.as_str(),
            self.conducting_body.as_str(),
        ]
    }
}
