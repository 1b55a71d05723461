use serde::{Deserialize, Serialize};

use super::Item;
use crate::types::Resource;

/// A college listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct College {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub country_ref: Option<CountryRef>,
    #[serde(default)]
    pub exams: Vec<String>,
    #[serde(default)]
    pub ranking: Option<u32>,
    #[serde(default)]
    pub establishment_year: Option<i32>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

/// Country reference; populated objects and bare names both occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountryRef {
    Populated {
        name: String,
        #[serde(default)]
        slug: Option<String>,
    },
    Name(String),
}

impl CountryRef {
    pub fn name(&self) -> &str {
        match self {
            CountryRef::Populated { name, .. } => name,
            CountryRef::Name(name) => name,
        }
    }
}

impl College {
    pub fn country(&self) -> Option<&str> {
        self.country_ref
            .as_ref()
            .map(CountryRef::name)
            .filter(|name| !name.is_empty())
    }
}

impl Item for College {
    const RESOURCE: Resource = Resource::Colleges;

    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn category_values(&self) -> Vec<&str> {
        self.country().into_iter().collect()
    }

    fn secondary_values(&self) -> Vec<&str> {
        self.exams.iter().map(String::as_str).collect()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.country());
        fields
    }
}
